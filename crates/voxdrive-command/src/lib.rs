pub mod dispatcher;
pub mod extractor;
pub mod interpreter;
pub mod normalizer;
pub mod number;

pub use dispatcher::{dispatch, matching_rule, DispatchRule, DISPATCH_RULES};
pub use extractor::{extract, Argument, INCHES_PER_FOOT};
pub use interpreter::{CommandInterpreter, Interpretation, NormalizedCommand};
pub use normalizer::{normalize, CommandNormalizer, RewriteRule, BUILTIN_REWRITES};
pub use number::{number_phrases, parse_number};
