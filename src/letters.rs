//! Arabic script tables: equivalence classes, joining behavior, mark stripping

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// The elongation character (kashida), stripped alongside combining marks.
pub const TATWEEL: char = 'ـ';

/// Letters that connect to a preceding letter but never to a following one.
pub const LEFT_NO_JOIN: &str = "ادذرزوؤأٱإءة";

/// Letters that connect on both sides. The kashida joins on both sides too.
pub const DUAL_JOIN: &str = "بتثجحخسشصضطظعغفقكلمنهيئىـ";

/// The one letter that never connects on either side.
pub const NO_JOIN: &str = "ء";

/// Every letter as it appears in base text: `LEFT_NO_JOIN` then `DUAL_JOIN`.
pub const ALL_LETTERS: &str = "ادذرزوؤأٱإءةبتثجحخسشصضطظعغفقكلمنهيئىـ";

/// Beh-group letters whose initial/medial shape only differs when a letter
/// follows them; used by the lookahead branch of the beh-class expansion.
pub const BEH_JOINED: &str = "بتثنيئى";

/// A set of letters treated as interchangeable in lenient search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterClass {
    Alef,
    Hah,
    Dal,
    Reh,
    Seen,
    Sad,
    Tah,
    Ain,
    Beh,
}

impl LetterClass {
    /// Class of a letter, if it belongs to one.
    pub fn of(c: char) -> Option<LetterClass> {
        let class = match c {
            'ا' | 'آ' | 'ٱ' | 'أ' | 'إ' => LetterClass::Alef,
            'ج' | 'ح' | 'خ' => LetterClass::Hah,
            'د' | 'ذ' => LetterClass::Dal,
            'ر' | 'ز' => LetterClass::Reh,
            'س' | 'ش' => LetterClass::Seen,
            'ص' | 'ض' => LetterClass::Sad,
            'ط' | 'ظ' => LetterClass::Tah,
            'ع' | 'غ' => LetterClass::Ain,
            'ب' | 'ت' | 'ث' => LetterClass::Beh,
            _ => return None,
        };
        Some(class)
    }

    /// The letters of this class.
    pub fn members(self) -> &'static str {
        match self {
            LetterClass::Alef => "اآٱأإ",
            LetterClass::Hah => "جحخ",
            LetterClass::Dal => "دذ",
            LetterClass::Reh => "رز",
            LetterClass::Seen => "سش",
            LetterClass::Sad => "صض",
            LetterClass::Tah => "طظ",
            LetterClass::Ain => "عغ",
            LetterClass::Beh => "بتث",
        }
    }
}

/// How a letter participates in cursive joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joining {
    /// Connects to a preceding letter only.
    LeftNoJoin,
    /// Connects on both sides.
    DualJoin,
    /// Never connects.
    NoJoin,
}

/// Joining behavior of a letter; `None` for anything outside the tables.
/// Hamza reports `NoJoin`, its distinguished role, though it also sits in
/// the left-no-join table for boundary checks (see the predicates below).
pub fn joining_of(c: char) -> Option<Joining> {
    if NO_JOIN.contains(c) {
        Some(Joining::NoJoin)
    } else if LEFT_NO_JOIN.contains(c) {
        Some(Joining::LeftNoJoin)
    } else if DUAL_JOIN.contains(c) {
        Some(Joining::DualJoin)
    } else {
        None
    }
}

/// Membership in the left-no-join table. Includes hamza.
pub fn is_left_no_join(c: char) -> bool {
    LEFT_NO_JOIN.contains(c)
}

/// Membership in the dual-join table.
pub fn is_dual_join(c: char) -> bool {
    DUAL_JOIN.contains(c)
}

/// Membership in the no-join table.
pub fn is_no_join(c: char) -> bool {
    NO_JOIN.contains(c)
}

/// Strip combining marks and the kashida, decomposing first so that
/// hamza/madda carriers collapse to their base letters (أ آ إ become ا,
/// ؤ becomes و, ئ becomes ي).
pub fn strip_marks(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c) && *c != TATWEEL)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_lookup() {
        assert_eq!(LetterClass::of('ا'), Some(LetterClass::Alef));
        assert_eq!(LetterClass::of('إ'), Some(LetterClass::Alef));
        assert_eq!(LetterClass::of('ش'), Some(LetterClass::Seen));
        assert_eq!(LetterClass::of('ب'), Some(LetterClass::Beh));
        assert_eq!(LetterClass::of('ث'), Some(LetterClass::Beh));
        // lam and noon carry no equivalence class
        assert_eq!(LetterClass::of('ل'), None);
        assert_eq!(LetterClass::of('ن'), None);
        assert_eq!(LetterClass::of('x'), None);
    }

    #[test]
    fn test_class_members_contain_their_letters() {
        for c in "اآٱأإجحخدذرزسشصضطظعغبتث".chars() {
            let class = LetterClass::of(c).unwrap();
            assert!(class.members().contains(c), "{c} missing from its class");
        }
    }

    #[test]
    fn test_joining_partition() {
        assert_eq!(joining_of('ا'), Some(Joining::LeftNoJoin));
        assert_eq!(joining_of('و'), Some(Joining::LeftNoJoin));
        assert_eq!(joining_of('ب'), Some(Joining::DualJoin));
        assert_eq!(joining_of('م'), Some(Joining::DualJoin));
        assert_eq!(joining_of('ء'), Some(Joining::NoJoin));
        assert_eq!(joining_of('x'), None);
    }

    #[test]
    fn test_hamza_sits_in_two_tables() {
        assert!(is_left_no_join('ء'));
        assert!(is_no_join('ء'));
        assert!(!is_dual_join('ء'));
    }

    #[test]
    fn test_all_letters_is_both_tables() {
        let combined: String = format!("{LEFT_NO_JOIN}{DUAL_JOIN}");
        assert_eq!(ALL_LETTERS, combined);
    }

    #[test]
    fn test_strip_marks_removes_diacritics() {
        assert_eq!(strip_marks("بِسْمِ"), "بسم");
        assert_eq!(strip_marks("ٱلرَّحِيمِ"), "ٱلرحيم");
    }

    #[test]
    fn test_strip_marks_decomposes_hamza_carriers() {
        assert_eq!(strip_marks("أَحَد"), "احد");
        assert_eq!(strip_marks("آمَنَ"), "امن");
        assert_eq!(strip_marks("مُؤْمِن"), "مومن");
        assert_eq!(strip_marks("سُئِلَ"), "سيل");
    }

    #[test]
    fn test_strip_marks_removes_kashida() {
        assert_eq!(strip_marks("ٱلرَّحْمَـٰنِ"), "ٱلرحمن");
        assert_eq!(strip_marks("بـس"), "بس");
    }
}
