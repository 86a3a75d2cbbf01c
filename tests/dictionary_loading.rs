use std::fs;
use std::path::{Path, PathBuf};

use quibble::words::{load_dictionary, Word};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data")
}

#[test]
fn loader_filters_uppercases_and_sorts() {
    let dictionary = load_dictionary(&data_dir(), 5, &[]).expect("fixture files load");

    assert_eq!(dictionary.word_length(), 5);
    assert_eq!(dictionary.common_words.len(), 16);
    // OLEA (wrong length) and ST1CK (not alphabetic) are dropped.
    assert_eq!(dictionary.all_words.len(), 21);

    assert!(dictionary.all_words.contains(&Word::new("STICK")));
    assert!(dictionary.all_words.contains(&Word::new("NYMPH")));
    assert!(!dictionary.all_words.contains(&Word::new("OLEA")));

    // Sorted ascending with a self-index.
    let words = dictionary.all_words.words();
    assert!(words.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(dictionary.all_words.index()[0], 0);
}

#[test]
fn common_words_are_a_subset_of_all_words() {
    let dictionary = load_dictionary(&data_dir(), 5, &[]).expect("fixture files load");
    for word in dictionary.common_words.iter() {
        assert!(
            dictionary.all_words.contains(word),
            "{word} missing from the allowed list"
        );
    }
}

#[test]
fn extras_are_merged_into_both_lists() {
    let extras = [Word::new("QUIBS"), Word::new("TOOLONGNOW")];
    let dictionary = load_dictionary(&data_dir(), 5, &extras).expect("fixture files load");

    // The right-sized extra lands in both lists; the mis-sized one is dropped.
    assert!(dictionary.common_words.contains(&Word::new("QUIBS")));
    assert!(dictionary.all_words.contains(&Word::new("QUIBS")));
    assert!(!dictionary.all_words.contains(&Word::new("TOOLONGNOW")));
}

#[test]
fn missing_files_surface_as_io_errors() {
    let err = load_dictionary(Path::new("no/such/dir"), 5, &[]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn malformed_json_is_invalid_data() {
    let dir = std::env::temp_dir().join("quibble_bad_dictionary");
    fs::create_dir_all(&dir).expect("temp dir");
    fs::write(dir.join("dictionary-full-official.json"), "not json").expect("write fixture");
    fs::write(dir.join("dictionary-answers-official.json"), "[]").expect("write fixture");

    let err = load_dictionary(&dir, 5, &[]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let _ = fs::remove_dir_all(&dir);
}
