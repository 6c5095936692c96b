// Property tests over generated markup.
//
// Generated documents are well nested, use lowercase text and attribute
// values, and mix casing, quoting and void-element closing freely.

use std::sync::LazyLock;

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::select;
use regex::Regex;
use xhtml_strict::{convert, validate, ErrorKind, Options};

static VOID_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:br|img|hr|input)(?:\s[^>]*)?>").unwrap()
});

fn attribute() -> impl Strategy<Value = String> {
    (
        select(vec!["class", "CLASS", "id", "Id", "title", "data-x", "DATA-Y"]),
        "[a-z]{1,6}",
        any::<bool>(),
    )
        .prop_map(|(name, value, quoted)| {
            if quoted {
                format!(" {name}=\"{value}\"")
            } else {
                format!(" {name}={value}")
            }
        })
}

fn void_element() -> impl Strategy<Value = String> {
    (
        select(vec!["br", "BR", "img", "IMG", "hr", "input", "Input"]),
        vec(attribute(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(name, attrs, closed)| {
            format!("<{name}{}{}>", attrs.concat(), if closed { " /" } else { "" })
        })
}

fn fragment() -> impl Strategy<Value = String> {
    let leaf = prop_oneof!["[a-z ]{0,8}", void_element()];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            select(vec!["div", "DIV", "Div", "span", "SPAN", "section", "em", "EM"]),
            vec(attribute(), 0..3),
            vec(inner, 0..4),
        )
            .prop_map(|(name, attrs, children)| {
                format!("<{name}{}>{}</{name}>", attrs.concat(), children.concat())
            })
    })
}

fn fixed(input: &str) -> String {
    convert(input.as_bytes(), &Options::fix())
        .unwrap()
        .output_str()
        .to_string()
}

proptest! {
    #[test]
    fn fix_output_has_no_uppercase(input in fragment()) {
        let output = fixed(&input);
        prop_assert!(!output.chars().any(|c| c.is_ascii_uppercase()), "{}", output);
    }

    #[test]
    fn fix_output_self_closes_void_elements(input in fragment()) {
        let output = fixed(&input);
        for tag in VOID_TAG.find_iter(&output) {
            prop_assert!(tag.as_str().ends_with(" />"), "{} in {}", tag.as_str(), output);
        }
        for name in ["br", "img", "hr", "input"] {
            let closing = format!("</{name}>");
            prop_assert!(!output.contains(&closing));
        }
    }

    #[test]
    fn fix_is_idempotent(input in fragment()) {
        let once = fixed(&input);
        let again = convert(once.as_bytes(), &Options::fix()).unwrap();
        prop_assert_eq!(again.output_str(), once.as_str());
        prop_assert!(again.changes().is_empty(), "{:?}", again.changes());
    }

    #[test]
    fn fixed_output_round_trips_unchanged(input in fragment()) {
        let once = fixed(&input);
        let checked = convert(once.as_bytes(), &Options::new()).unwrap();
        prop_assert!(checked.success());
        prop_assert_eq!(checked.output_str(), once.as_str());
        prop_assert!(validate(once.as_bytes()).is_ok());
    }

    #[test]
    fn strict_rejects_any_defect(
        defect in select(vec!["<BR>", "<br>", "<p CLASS=\"a\"></p>", "<p class=a></p>", "<DIV></DIV>"]),
        rest in fragment(),
    ) {
        let input = format!("{defect}{rest}");
        let err = convert(input.as_bytes(), &Options::strict()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }
}
