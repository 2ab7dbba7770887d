use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

/// Static reference data for one book of the Bible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BibleBook {
    pub id: &'static str,
    pub name: &'static str,
    pub testament: Testament,
    pub chapters: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub id: &'static str,
    pub name: &'static str,
}

/// Translations the public text API serves without authentication.
pub const TRANSLATIONS: &[Translation] = &[
    Translation { id: "kjv", name: "King James Version" },
    Translation { id: "web", name: "World English Bible" },
    Translation { id: "asv", name: "American Standard Version" },
    Translation { id: "bbe", name: "Bible in Basic English" },
    Translation { id: "darby", name: "Darby Translation" },
    Translation { id: "ylt", name: "Young's Literal Translation" },
];

macro_rules! book {
    ($id:literal, $name:literal, $testament:ident, $chapters:literal) => {
        BibleBook {
            id: $id,
            name: $name,
            testament: Testament::$testament,
            chapters: $chapters,
        }
    };
}

pub const BOOKS: &[BibleBook] = &[
    book!("gen", "Genesis", Old, 50),
    book!("exo", "Exodus", Old, 40),
    book!("lev", "Leviticus", Old, 27),
    book!("num", "Numbers", Old, 36),
    book!("deu", "Deuteronomy", Old, 34),
    book!("jos", "Joshua", Old, 24),
    book!("jdg", "Judges", Old, 21),
    book!("rut", "Ruth", Old, 4),
    book!("1sa", "1 Samuel", Old, 31),
    book!("2sa", "2 Samuel", Old, 24),
    book!("1ki", "1 Kings", Old, 22),
    book!("2ki", "2 Kings", Old, 25),
    book!("1ch", "1 Chronicles", Old, 29),
    book!("2ch", "2 Chronicles", Old, 36),
    book!("ezr", "Ezra", Old, 10),
    book!("neh", "Nehemiah", Old, 13),
    book!("est", "Esther", Old, 10),
    book!("job", "Job", Old, 42),
    book!("psa", "Psalms", Old, 150),
    book!("pro", "Proverbs", Old, 31),
    book!("ecc", "Ecclesiastes", Old, 12),
    book!("sng", "Song of Solomon", Old, 8),
    book!("isa", "Isaiah", Old, 66),
    book!("jer", "Jeremiah", Old, 52),
    book!("lam", "Lamentations", Old, 5),
    book!("ezk", "Ezekiel", Old, 48),
    book!("dan", "Daniel", Old, 12),
    book!("hos", "Hosea", Old, 14),
    book!("jol", "Joel", Old, 3),
    book!("amo", "Amos", Old, 9),
    book!("oba", "Obadiah", Old, 1),
    book!("jon", "Jonah", Old, 4),
    book!("mic", "Micah", Old, 7),
    book!("nam", "Nahum", Old, 3),
    book!("hab", "Habakkuk", Old, 3),
    book!("zep", "Zephaniah", Old, 3),
    book!("hag", "Haggai", Old, 2),
    book!("zec", "Zechariah", Old, 14),
    book!("mal", "Malachi", Old, 4),
    book!("mat", "Matthew", New, 28),
    book!("mrk", "Mark", New, 16),
    book!("luk", "Luke", New, 24),
    book!("jhn", "John", New, 21),
    book!("act", "Acts", New, 28),
    book!("rom", "Romans", New, 16),
    book!("1co", "1 Corinthians", New, 16),
    book!("2co", "2 Corinthians", New, 13),
    book!("gal", "Galatians", New, 6),
    book!("eph", "Ephesians", New, 6),
    book!("php", "Philippians", New, 4),
    book!("col", "Colossians", New, 4),
    book!("1th", "1 Thessalonians", New, 5),
    book!("2th", "2 Thessalonians", New, 3),
    book!("1ti", "1 Timothy", New, 6),
    book!("2ti", "2 Timothy", New, 4),
    book!("tit", "Titus", New, 3),
    book!("phm", "Philemon", New, 1),
    book!("heb", "Hebrews", New, 13),
    book!("jas", "James", New, 5),
    book!("1pe", "1 Peter", New, 5),
    book!("2pe", "2 Peter", New, 3),
    book!("1jn", "1 John", New, 5),
    book!("2jn", "2 John", New, 1),
    book!("3jn", "3 John", New, 1),
    book!("jud", "Jude", New, 1),
    book!("rev", "Revelation", New, 22),
];

pub fn find_book(id: &str) -> Option<&'static BibleBook> {
    BOOKS.iter().find(|book| book.id == id)
}

pub fn find_translation(id: &str) -> Option<&'static Translation> {
    TRANSLATIONS.iter().find(|t| t.id == id)
}
