/*!
 * Tests for language utilities
 */

use vocab_trainer::language_utils::{get_language_name, language_label, parse_language_pair, validate_language_code};

#[test]
fn test_validateLanguageCode_withMixedCase_shouldNormalize() {
    assert!(validate_language_code("EN").is_ok());
    assert!(validate_language_code(" fr ").is_ok());
}

#[test]
fn test_getLanguageName_withKnownCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert!(get_language_name("klingon").is_err());
}

#[test]
fn test_languageLabel_withUnknownCode_shouldFallBackToCode() {
    assert_eq!(language_label("en"), "English (en)");
    assert_eq!(language_label("xx-custom"), "xx-custom");
}

#[test]
fn test_parseLanguagePair_shouldTrimParts() {
    assert_eq!(
        parse_language_pair(" en - es "),
        Some(("en".to_string(), "es".to_string()))
    );
    assert_eq!(parse_language_pair(""), None);
    assert_eq!(parse_language_pair("en--es"), None);
}
