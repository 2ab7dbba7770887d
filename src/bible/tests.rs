use super::books::{Testament, BOOKS};
use super::*;
use httpmock::prelude::*;
use serde_json::json;

#[test]
fn canon_has_sixty_six_books() {
    assert_eq!(BOOKS.len(), 66);
    let old = BOOKS.iter().filter(|b| b.testament == Testament::Old).count();
    let new = BOOKS.iter().filter(|b| b.testament == Testament::New).count();
    assert_eq!(old, 39);
    assert_eq!(new, 27);
}

#[test]
fn chapter_counts_spot_check() {
    let bible = BibleService::new();
    assert_eq!(bible.book("gen").unwrap().chapters, 50);
    assert_eq!(bible.book("psa").unwrap().chapters, 150);
    assert_eq!(bible.book("rev").unwrap().chapters, 22);
    assert!(bible.book("xyz").is_none());
}

#[test]
fn book_ids_are_unique() {
    let mut ids: Vec<_> = BOOKS.iter().map(|b| b.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 66);
}

#[tokio::test]
async fn chapter_fetch_parses_verses() {
    let server = MockServer::start();
    let bible = BibleService::with_base_url(server.base_url());

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/John+3")
            .query_param("translation", "kjv");
        then.status(200).json_body(json!({
            "reference": "John 3",
            "verses": [
                {
                    "book_id": "JHN",
                    "book_name": "John",
                    "chapter": 3,
                    "verse": 16,
                    "text": "For God so loved the world..."
                }
            ],
            "translation_id": "kjv",
            "translation_name": "King James Version"
        }));
    });

    let chapter = bible.chapter("jhn", 3, "kjv").await.unwrap();
    assert_eq!(chapter.reference, "John 3");
    assert_eq!(chapter.verses.len(), 1);
    assert_eq!(chapter.verses[0].verse, 16);
    assert_eq!(chapter.translation_id, "kjv");
    mock.assert();
}

#[tokio::test]
async fn multi_word_book_names_use_plus_separators() {
    let server = MockServer::start();
    let bible = BibleService::with_base_url(server.base_url());

    let mock = server.mock(|when, then| {
        when.method(GET).path("/1+Corinthians+13");
        then.status(200).json_body(json!({
            "reference": "1 Corinthians 13",
            "verses": [],
            "translation_id": "web"
        }));
    });

    bible.chapter("1co", 13, "web").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn out_of_range_chapter_fails_before_any_request() {
    let server = MockServer::start();
    let bible = BibleService::with_base_url(server.base_url());

    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let err = bible.chapter("jud", 2, "kjv").await.unwrap_err();
    assert!(matches!(
        err,
        BibleError::ChapterOutOfRange {
            max: 1,
            requested: 2,
            ..
        }
    ));

    let err = bible.chapter("gen", 0, "kjv").await.unwrap_err();
    assert!(matches!(err, BibleError::ChapterOutOfRange { .. }));

    let err = bible.chapter("gen", 1, "nope").await.unwrap_err();
    assert!(matches!(err, BibleError::UnknownTranslation(_)));

    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn search_verses_always_resolves_to_an_array() {
    let bible = BibleService::new();
    let verses = bible.search_verses("love").await.unwrap();
    assert!(verses.is_empty());

    let verses = bible.search_verses("").await.unwrap();
    assert!(verses.is_empty());
}
