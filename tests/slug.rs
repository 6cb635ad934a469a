use game_exchange_api::slug::slugify;

#[test]
fn lowercases_and_hyphenates() {
    assert_eq!(slugify("Horizon Forbidden West"), "horizon-forbidden-west");
}

#[test]
fn strips_punctuation() {
    assert_eq!(
        slugify("Spider-Man: Miles Morales"),
        "spider-man-miles-morales"
    );
    assert_eq!(
        slugify("Ratchet & Clank: Rift Apart"),
        "ratchet-clank-rift-apart"
    );
}

#[test]
fn drops_non_ascii() {
    // Accented characters are stripped rather than transliterated.
    assert_eq!(slugify("God of War Ragnarök"), "god-of-war-ragnark");
}

#[test]
fn collapses_whitespace_and_hyphens() {
    assert_eq!(slugify("  Hello   World  "), "hello-world");
    assert_eq!(slugify("a --- b"), "a-b");
}

#[test]
fn keeps_digits() {
    assert_eq!(slugify("Gran Turismo 7"), "gran-turismo-7");
    assert_eq!(slugify("100% Authentic!"), "100-authentic");
}

#[test]
fn empty_when_nothing_survives() {
    assert_eq!(slugify("!!!"), "");
    assert_eq!(slugify("   "), "");
}
