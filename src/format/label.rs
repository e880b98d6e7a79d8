//! Header label derivation.
//!
//! Raw record keys become display labels through a fixed sequence of small
//! pure transforms: strip the `Id`/`Ids` suffix, substitute the domain
//! synonym `client` → `customer`, insert spaces at word boundaries,
//! title-case each word, then apply the word-level synonym table.

/// Word-level substitutions applied after title-casing.
const WORD_SYNONYMS: &[(&str, &str)] = &[("Classificator", "Type")];

/// Derive the display label for a raw field key.
pub fn derive_label(raw_key: &str) -> String {
    let stripped = strip_id_suffix(raw_key);
    let substituted = substitute_customer(stripped);
    let spaced = split_word_boundaries(&substituted);
    let titled = title_case_words(&spaced);
    apply_word_synonyms(&titled)
}

/// Drop a trailing `Ids` or `Id` reference-field suffix.
fn strip_id_suffix(key: &str) -> &str {
    if let Some(stripped) = key.strip_suffix("Ids") {
        stripped
    } else if let Some(stripped) = key.strip_suffix("Id") {
        stripped
    } else {
        key
    }
}

/// Replace every case-insensitive `client` with `customer`, keeping the
/// case of the match's first letter.
fn substitute_customer(input: &str) -> String {
    const NEEDLE: &str = "client";

    let lower = input.to_ascii_lowercase();
    let mut out = String::with_capacity(input.len() + 8);
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(NEEDLE) {
        let start = cursor + found;
        out.push_str(&input[cursor..start]);

        let capitalized = input[start..].starts_with('C');
        out.push_str(if capitalized { "Customer" } else { "customer" });

        cursor = start + NEEDLE.len();
    }

    out.push_str(&input[cursor..]);
    out
}

/// Insert a space at each lowercase→uppercase boundary.
fn split_word_boundaries(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;

    for ch in input.chars() {
        if prev_lower && ch.is_uppercase() {
            out.push(' ');
        }
        prev_lower = ch.is_lowercase();
        out.push(ch);
    }

    out
}

/// Uppercase the first letter of every word, leaving the rest untouched.
fn title_case_words(input: &str) -> String {
    input
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn apply_word_synonyms(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            WORD_SYNONYMS
                .iter()
                .find(|(from, _)| *from == word)
                .map_or(word, |(_, to)| *to)
        })
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reference_suffixes() {
        assert_eq!(strip_id_suffix("clientId"), "client");
        assert_eq!(strip_id_suffix("fileIds"), "file");
        assert_eq!(strip_id_suffix("status"), "status");
        // Lowercase "id" is not the reference suffix convention.
        assert_eq!(strip_id_suffix("paid"), "paid");
    }

    #[test]
    fn substitutes_customer_preserving_case() {
        assert_eq!(substitute_customer("client"), "customer");
        assert_eq!(substitute_customer("surgeryClient"), "surgeryCustomer");
        assert_eq!(substitute_customer("Client"), "Customer");
        assert_eq!(substitute_customer("status"), "status");
    }

    #[test]
    fn splits_at_lowercase_uppercase_boundaries() {
        assert_eq!(split_word_boundaries("deviceName"), "device Name");
        assert_eq!(split_word_boundaries("thirdPartyIT"), "third Party IT");
        assert_eq!(split_word_boundaries("status"), "status");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case_words("surgery customer"), "Surgery Customer");
        assert_eq!(title_case_words("third Party IT"), "Third Party IT");
    }

    #[test]
    fn derives_expected_labels() {
        assert_eq!(derive_label("classificatorId"), "Type");
        assert_eq!(derive_label("surgeryClient"), "Surgery Customer");
        assert_eq!(derive_label("maintenanceIds"), "Maintenance");
        assert_eq!(derive_label("clientId"), "Customer");
        assert_eq!(derive_label("deviceName"), "Device Name");
        assert_eq!(derive_label("thirdPartyITId"), "Third Party IT");
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(derive_label("warrantyRepair"), derive_label("warrantyRepair"));
    }
}
