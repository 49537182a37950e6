use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compares two strings in natural (human) order: embedded digit runs compare
/// by numeric value, so `file2` sorts before `file10`. Everything else
/// compares by code point, case-sensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ordering = compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(left: &str, right: &str) -> Ordering {
    let left_value = left.trim_start_matches('0');
    let right_value = right.trim_start_matches('0');

    // Same value: fewer leading zeros first, so "7" < "07"
    left_value
        .len()
        .cmp(&right_value.len())
        .then_with(|| left_value.cmp(right_value))
        .then_with(|| left.len().cmp(&right.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("file2.txt", "file10.txt", Ordering::Less)]
    #[case("file10.txt", "file2.txt", Ordering::Greater)]
    #[case("file1.txt", "file1.txt", Ordering::Equal)]
    #[case("a", "b", Ordering::Less)]
    #[case("a", "a1", Ordering::Less)]
    #[case("img12b", "img12a", Ordering::Greater)]
    #[case("7", "07", Ordering::Less)]
    #[case("x99999999999999999999999", "x100000000000000000000000", Ordering::Less)]
    #[case("B", "a", Ordering::Less)]
    fn compares_naturally(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(natural_cmp(a, b), expected);
    }

    #[test]
    fn sorts_a_listing() {
        let mut names = vec!["file10.txt", "file1.txt", "file2.txt", "dir/file3"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["dir/file3", "file1.txt", "file2.txt", "file10.txt"]);
    }
}
