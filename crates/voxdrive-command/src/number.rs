//! Spelled-out English cardinals ("one hundred and twelve") to integers.
//!
//! Number words are grouped into phrases. A phrase ends at any word that is
//! not a number word, or at a number word that cannot extend it under normal
//! English composition: "twenty four" is one phrase, "four twelve" is two.
//! A bare run of ASCII digits is a phrase by itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberWord {
    Unit(i64),
    Teen(i64),
    Tens(i64),
    Hundred,
    Scale(i64),
    And,
}

fn classify(word: &str) -> Option<NumberWord> {
    use NumberWord::*;
    let class = match word {
        "zero" => Unit(0),
        "one" => Unit(1),
        "two" => Unit(2),
        "three" => Unit(3),
        "four" => Unit(4),
        "five" => Unit(5),
        "six" => Unit(6),
        "seven" => Unit(7),
        "eight" => Unit(8),
        "nine" => Unit(9),
        "ten" => Teen(10),
        "eleven" => Teen(11),
        "twelve" => Teen(12),
        "thirteen" => Teen(13),
        "fourteen" => Teen(14),
        "fifteen" => Teen(15),
        "sixteen" => Teen(16),
        "seventeen" => Teen(17),
        "eighteen" => Teen(18),
        "nineteen" => Teen(19),
        "twenty" => Tens(20),
        "thirty" => Tens(30),
        "forty" => Tens(40),
        "fifty" => Tens(50),
        "sixty" => Tens(60),
        "seventy" => Tens(70),
        "eighty" => Tens(80),
        "ninety" => Tens(90),
        "hundred" => Hundred,
        "thousand" => Scale(1_000),
        "million" => Scale(1_000_000),
        "billion" => Scale(1_000_000_000),
        "and" => And,
        _ => return None,
    };
    Some(class)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Unit,
    Zero,
    Teen,
    Tens,
    Hundred,
    Scale,
}

/// Accumulates one phrase; `feed` refuses words that would start a new one.
#[derive(Debug, Default)]
struct Phrase {
    total: i64,
    group: i64,
    last: Option<Last>,
    group_has_hundred: bool,
    smallest_scale: Option<i64>,
}

impl Phrase {
    fn is_open(&self) -> bool {
        self.last.is_some()
    }

    fn value(&self) -> i64 {
        self.total.saturating_add(self.group)
    }

    fn feed(&mut self, word: NumberWord) -> bool {
        match word {
            NumberWord::And => self.is_open(),
            NumberWord::Unit(0) => {
                if self.is_open() {
                    return false;
                }
                self.last = Some(Last::Zero);
                true
            }
            NumberWord::Unit(v) => {
                if !matches!(self.last, None | Some(Last::Tens | Last::Hundred | Last::Scale)) {
                    return false;
                }
                self.group += v;
                self.last = Some(Last::Unit);
                true
            }
            NumberWord::Teen(v) | NumberWord::Tens(v) => {
                if !matches!(self.last, None | Some(Last::Hundred | Last::Scale)) {
                    return false;
                }
                self.group += v;
                self.last = Some(if v < 20 { Last::Teen } else { Last::Tens });
                true
            }
            NumberWord::Hundred => {
                if self.group_has_hundred {
                    return false;
                }
                match self.last {
                    None => self.group = 100,
                    Some(Last::Unit | Last::Teen | Last::Tens) => self.group *= 100,
                    _ => return false,
                }
                self.group_has_hundred = true;
                self.last = Some(Last::Hundred);
                true
            }
            NumberWord::Scale(scale) => {
                if matches!(self.last, Some(Last::Scale | Last::Zero))
                    || self.smallest_scale.is_some_and(|s| scale >= s)
                {
                    return false;
                }
                let multiplier = if self.last.is_none() { 1 } else { self.group };
                self.total = self
                    .total
                    .saturating_add(multiplier.saturating_mul(scale));
                self.group = 0;
                self.group_has_hundred = false;
                self.smallest_scale = Some(scale);
                self.last = Some(Last::Scale);
                true
            }
        }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
}

/// Every number phrase in `text`, in order of appearance.
pub fn number_phrases(text: &str) -> Vec<i64> {
    let mut phrases = Vec::new();
    let mut current = Phrase::default();

    for token in tokens(text) {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if current.is_open() {
                phrases.push(current.value());
                current = Phrase::default();
            }
            phrases.push(token.parse::<i64>().unwrap_or(i64::MAX));
            continue;
        }

        match classify(&token) {
            Some(word) => {
                if current.feed(word) {
                    continue;
                }
                if current.is_open() {
                    phrases.push(current.value());
                }
                current = Phrase::default();
                // A word that cannot open a phrase ("and") is simply dropped.
                let _ = current.feed(word);
            }
            None => {
                if current.is_open() {
                    phrases.push(current.value());
                    current = Phrase::default();
                }
            }
        }
    }

    if current.is_open() {
        phrases.push(current.value());
    }
    phrases
}

/// The magnitude spoken in `text`: the last number phrase, if any.
///
/// The last phrase wins because the normalizer turns "for"/"to" into "four"
/// and "two", which land in front of the real argument
/// ("lift four twelve degrees").
pub fn parse_number(text: &str) -> Option<i64> {
    number_phrases(text).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_words() {
        assert_eq!(parse_number("zero"), Some(0));
        assert_eq!(parse_number("seven"), Some(7));
        assert_eq!(parse_number("twelve"), Some(12));
        assert_eq!(parse_number("ninety"), Some(90));
    }

    #[test]
    fn test_compound_numbers() {
        assert_eq!(parse_number("twenty four"), Some(24));
        assert_eq!(parse_number("twenty-four"), Some(24));
        assert_eq!(parse_number("one hundred"), Some(100));
        assert_eq!(parse_number("one hundred and twelve"), Some(112));
        assert_eq!(parse_number("three hundred sixty"), Some(360));
        assert_eq!(parse_number("twelve hundred"), Some(1200));
        assert_eq!(parse_number("two thousand and twenty five"), Some(2025));
        assert_eq!(parse_number("one million two hundred thousand"), Some(1_200_000));
        assert_eq!(parse_number("hundred"), Some(100));
        assert_eq!(parse_number("thousand"), Some(1000));
    }

    #[test]
    fn test_number_inside_command() {
        assert_eq!(parse_number("move forward twelve feet"), Some(12));
        assert_eq!(parse_number("turn right ninety degrees"), Some(90));
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parse_number("stop"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("forward and back"), None);
    }

    #[test]
    fn test_adjacent_phrases_split() {
        assert_eq!(number_phrases("four twelve"), vec![4, 12]);
        assert_eq!(number_phrases("two two"), vec![2, 2]);
        assert_eq!(number_phrases("twelve three"), vec![12, 3]);
        assert_eq!(number_phrases("twenty thirty"), vec![20, 30]);
        assert_eq!(number_phrases("one hundred two hundred"), vec![102, 100]);
        assert_eq!(number_phrases("zero five"), vec![0, 5]);
    }

    #[test]
    fn test_scales_must_descend() {
        assert_eq!(number_phrases("two thousand three thousand"), vec![2003, 1000]);
        assert_eq!(number_phrases("five thousand million"), vec![5000, 1_000_000]);
    }

    #[test]
    fn test_non_number_word_ends_phrase() {
        assert_eq!(number_phrases("four robot twelve degrees"), vec![4, 12]);
    }

    #[test]
    fn test_last_phrase_wins() {
        assert_eq!(parse_number("lift robot four twelve degrees"), Some(12));
        assert_eq!(parse_number("go two two feet"), Some(2));
        assert_eq!(parse_number("turn four right"), Some(4));
    }

    #[test]
    fn test_digit_tokens() {
        assert_eq!(parse_number("turn right 90 degrees"), Some(90));
        assert_eq!(number_phrases("four 12"), vec![4, 12]);
        assert_eq!(parse_number("forward 7."), Some(7));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(parse_number("Forward, Twenty-Five feet!"), Some(25));
    }

    #[test]
    fn test_leading_and_is_ignored() {
        assert_eq!(number_phrases("and five"), vec![5]);
        assert_eq!(number_phrases("five and"), vec![5]);
    }

    #[test]
    fn test_huge_values_saturate() {
        assert_eq!(parse_number("99999999999999999999999"), Some(i64::MAX));
        let big = "nine hundred ninety nine billion nine hundred ninety nine million";
        assert_eq!(parse_number(big), Some(999_999_000_000));
    }
}
