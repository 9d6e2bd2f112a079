use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating subject and reviewer identifiers
    /// Any non-empty id without surrounding whitespace or control characters
    /// - Valid: "STU001", "22bca-017", "Roll No. 17/B", "ÇAĞLA-3"
    /// - Invalid: "", " stu01", "stu01 ", "stu\n01"
    pub static ref MEMBER_ID_REGEX: Regex =
        Regex::new(r"^[^\s\p{Cc}](?:[^\p{Cc}]*[^\s\p{Cc}])?$").unwrap();

    /// Regex for the payload of a captured JPEG frame sent as a data URL
    /// - Valid: "data:image/jpeg;base64,/9j/4AAQ", "data:image/png;base64,iVBORw0"
    /// - Invalid: "image/jpeg;base64,...", "data:text/plain;base64,..."
    pub static ref FRAME_DATA_URL_REGEX: Regex =
        Regex::new(r"^data:(image/[a-z+.-]+);base64,(.*)$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_regex_valid() {
        assert!(MEMBER_ID_REGEX.is_match("STU001"));
        assert!(MEMBER_ID_REGEX.is_match("22bca-017"));
        assert!(MEMBER_ID_REGEX.is_match("tch_04"));
        assert!(MEMBER_ID_REGEX.is_match("a"));
        assert!(MEMBER_ID_REGEX.is_match("-stu"));
        assert!(MEMBER_ID_REGEX.is_match("Roll No. 17/B"));
        assert!(MEMBER_ID_REGEX.is_match("ÇAĞLA-3"));
    }

    #[test]
    fn test_member_id_regex_invalid() {
        assert!(!MEMBER_ID_REGEX.is_match("")); // empty
        assert!(!MEMBER_ID_REGEX.is_match(" stu01")); // leading space
        assert!(!MEMBER_ID_REGEX.is_match("stu01 ")); // trailing space
        assert!(!MEMBER_ID_REGEX.is_match("stu\n01")); // control character
        assert!(!MEMBER_ID_REGEX.is_match("\t")); // whitespace only
    }

    #[test]
    fn test_frame_data_url_regex() {
        let caps = FRAME_DATA_URL_REGEX
            .captures("data:image/jpeg;base64,/9j/4AAQ")
            .unwrap();
        assert_eq!(&caps[1], "image/jpeg");
        assert_eq!(&caps[2], "/9j/4AAQ");

        assert!(!FRAME_DATA_URL_REGEX.is_match("image/jpeg;base64,/9j/4AAQ"));
        assert!(!FRAME_DATA_URL_REGEX.is_match("data:text/plain;base64,aGk="));
    }
}
