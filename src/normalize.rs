use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PERCENT: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("static regex");
    static ref DIGITS: Regex = Regex::new(r"\d+").expect("static regex");
}

/// `width: 86%` -> 4.3. `None` when the style has no percentage.
pub fn rating_from_style(style: &str) -> Option<f64> {
    let pct: f64 = PERCENT.captures(style)?.get(1)?.as_str().parse().ok()?;
    let rating = (pct / 20.0 * 10.0).round() / 10.0;
    Some(rating.clamp(0.0, 5.0))
}

pub fn rating_cell(rating: Option<f64>) -> String {
    rating.map(|r| format!("{r:.1}")).unwrap_or_default()
}

pub fn first_int(text: &str) -> u64 {
    DIGITS
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub fn brand_from_name(name: &str) -> String {
    name.split_whitespace().next().unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Audience {
    Female,
    Male,
    Children,
    #[default]
    Unspecified,
}

const FEMALE: &[&str] = &["women", "girl", "ladies", "female"];
const MALE: &[&str] = &["men", "boy", "male"];
const CHILDREN: &[&str] = &["kid", "child", "children"];

impl Audience {
    // Female, Male, Children checked in that order
    pub fn classify(name: &str, short_description: &str) -> Self {
        let text = format!("{name} {short_description}").to_lowercase();
        let hit = |words: &[&str]| words.iter().any(|w| text.contains(*w));
        if hit(FEMALE) {
            Audience::Female
        } else if hit(MALE) {
            Audience::Male
        } else if hit(CHILDREN) {
            Audience::Children
        } else {
            Audience::Unspecified
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Audience::Female => "Female",
            Audience::Male => "Male",
            Audience::Children => "Children",
            Audience::Unspecified => "Unspecified",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("width: 86%", "4.3")]
    #[case("width: 100%", "5.0")]
    #[case("width:0%", "0.0")]
    #[case("width: 72.5 %", "3.6")]
    #[case("", "")]
    #[case("width: 40px", "")]
    #[case("display:none", "")]
    fn style_to_rating_cell(#[case] style: &str, #[case] expected: &str) {
        assert_eq!(rating_cell(rating_from_style(style)), expected);
    }

    #[test]
    fn every_percentage_lands_on_the_five_star_scale() {
        for tenths in 0..=1000 {
            let pct = tenths as f64 / 10.0;
            let r = rating_from_style(&format!("width: {pct}%")).unwrap();
            assert!((0.0..=5.0).contains(&r), "{pct}% -> {r}");
            assert_eq!(r, (r * 10.0).round() / 10.0);
        }
    }

    #[test]
    fn fill_above_full_is_capped() {
        assert_eq!(rating_from_style("width: 120%"), Some(5.0));
    }

    #[rstest]
    #[case("128 ratings", 128)]
    #[case("(1,024 reviews)", 1)]
    #[case("no reviews yet", 0)]
    #[case("", 0)]
    #[case("99999999999999999999999 huge", 0)]
    fn first_integer(#[case] text: &str, #[case] expected: u64) {
        assert_eq!(first_int(text), expected);
    }

    #[rstest]
    #[case("Women Running Shoes", "", Audience::Female)]
    #[case("Men Casual Shirt", "", Audience::Male)]
    #[case("Kids Sneakers", "", Audience::Children)]
    #[case("Leather Wallet", "", Audience::Unspecified)]
    #[case("Steel Watch", "for boys and girls", Audience::Female)]
    #[case("Combo Pack", "Sandals for KIDS", Audience::Children)]
    fn audience_priority(#[case] name: &str, #[case] desc: &str, #[case] expected: Audience) {
        assert_eq!(Audience::classify(name, desc), expected);
    }

    #[test]
    fn brand_is_the_first_word() {
        assert_eq!(brand_from_name("  Sparx Men Sneakers"), "Sparx");
        assert_eq!(brand_from_name(""), "");
    }
}
