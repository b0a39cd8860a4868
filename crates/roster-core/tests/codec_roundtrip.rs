//! Persistence round-trip and decode-ambiguity tests.
//!
//! The legacy format cannot represent every roster. These tests pin down
//! which rosters survive a save/load cycle and exactly how the others are
//! misread.

use roster_core::codec::{self, Dialect};
use roster_core::{CodecError, PersistError, Roster};

fn build(rows: &[(i64, &str, &[(&str, &[i32])], &[&str])]) -> Roster {
    let mut roster = Roster::new();
    for (id, name, grades, dates) in rows {
        roster.add_student(*id, *name).unwrap();
        for (subject, scores) in grades.iter() {
            roster.add_grades(*id, subject, scores).unwrap();
        }
        for date in dates.iter() {
            roster.mark_attendance(*id, *date).unwrap();
        }
    }
    roster
}

fn legacy_roundtrip(roster: &Roster) -> Roster {
    codec::decode(&codec::encode(roster, Dialect::Legacy), Dialect::Legacy).unwrap()
}

#[test]
fn empty_roster_roundtrips() {
    let roster = Roster::new();
    assert_eq!(codec::encode(&roster, Dialect::Legacy), "");
    assert_eq!(legacy_roundtrip(&roster), roster);
}

#[test]
fn representative_rosters_roundtrip() {
    let rosters = [
        build(&[(1, "Ann", &[], &[])]),
        build(&[
            (1, "John Doe", &[("Math", &[90]), ("Science", &[85])], &["2024-01-01"]),
            (2, "Jane Smith", &[("Math", &[80]), ("Science", &[88])], &[]),
        ]),
        build(&[
            (-4, "Neg", &[("Math", &[-1, 0, 100, 100])], &["d1", "d1", "d2"]),
            (10, "Ten", &[("History", &[55])], &["d2"]),
            (3, "O'Brien Jr.", &[("Art", &[70, 70, 70])], &[]),
        ]),
    ];
    for roster in &rosters {
        let decoded = legacy_roundtrip(roster);
        assert_eq!(
            &decoded,
            roster,
            "roster did not survive:\n{}",
            codec::encode(roster, Dialect::Legacy)
        );
    }
}

#[test]
fn roundtrip_preserves_sorted_order() {
    let mut roster = build(&[(3, "Cy", &[], &[]), (1, "Bo", &[], &[]), (2, "Al", &[], &[])]);
    roster.sort_by_name();
    assert_eq!(legacy_roundtrip(&roster).ids(), vec![2, 1, 3]);
}

#[test]
fn empty_name_is_misread() {
    let roster = build(&[
        (1, "Ann", &[("Math", &[90])], &["d1"]),
        (2, "", &[("Math", &[40]), ("Science", &[75])], &["d2"]),
        (3, "Cy", &[], &[]),
    ]);
    let decoded = legacy_roundtrip(&roster);

    assert_ne!(decoded, roster);
    // Student 2's identity line is lost and its fragments attach to student 1.
    assert_eq!(decoded.ids(), vec![1, 3]);
    let ann = decoded.get(1).unwrap();
    assert_eq!(ann.grades["Math"], vec![90, 40]);
    assert_eq!(ann.grades["Science"], vec![75]);
    assert_eq!(ann.attendance, vec!["d1", "d2"]);
}

#[test]
fn empty_subject_history_is_lost_in_legacy_but_kept_in_tagged() {
    let mut roster = build(&[(1, "Ann", &[("Math", &[90])], &[])]);
    roster.delete_grade(1, "Math", 90).unwrap();
    assert!(!roster.get(1).unwrap().has_no_grades());

    assert!(legacy_roundtrip(&roster).get(1).unwrap().has_no_grades());

    let tagged = codec::encode(&roster, Dialect::Tagged);
    let decoded = codec::decode(&tagged, Dialect::Tagged).unwrap();
    assert_eq!(decoded, roster);
}

#[test]
fn tagged_dialect_roundtrips_what_legacy_cannot() {
    let roster = build(&[
        (1, "", &[("Math", &[1])], &[]),
        (2, "Smith, Jane", &[], &["Mon, 1 Jan"]),
        (3, "100", &[("attendance", &[5])], &[]),
    ]);
    let text = codec::encode(&roster, Dialect::Tagged);
    assert_eq!(codec::decode(&text, Dialect::Tagged).unwrap(), roster);
    assert_ne!(legacy_roundtrip(&roster), roster);
}

#[test]
fn file_roundtrip_and_abort_policy() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let roster = build(&[(1, "Ann", &[("Math", &[90, 70])], &["d1"])]);
    roster.export_file(&good, Dialect::Legacy).unwrap();

    let mut loaded = Roster::new();
    loaded.import_file(&good, Dialect::Legacy).unwrap();
    assert_eq!(loaded, roster);

    // Append a line with a bad score: the whole import is rejected.
    let mut text = std::fs::read_to_string(&good).unwrap();
    text.push_str("Science,88,x\n");
    let bad = dir.path().join("bad.txt");
    std::fs::write(&bad, text).unwrap();

    let err = loaded.import_file(&bad, Dialect::Legacy).unwrap_err();
    match err {
        PersistError::Decode { source, .. } => {
            assert!(matches!(source, CodecError::InvalidScore { line: 4, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(loaded, roster);
}

#[test]
fn reading_a_legacy_file_as_tagged_fails_loudly() {
    let roster = build(&[(1, "Ann", &[], &[])]);
    let text = codec::encode(&roster, Dialect::Legacy);
    assert!(codec::decode(&text, Dialect::Tagged).is_err());
}
