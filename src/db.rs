//! SQLite-backed word store

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, Params, Row};
use tracing::{debug, info, warn};

use crate::error::{DictError, Result};
use crate::store::{BulkSummary, ConflictReason, RowConflict, WordStore};
use crate::word::{CategoryInfo, SortField, WordRecord};

const SELECT_WORDS: &str = "SELECT english, thai, category FROM words";

/// Word store kept in a single SQLite table.
///
/// `english` is the primary key and compares case-insensitively, so `Cat`
/// and `cat` cannot both be stored. The stored spelling is preserved.
pub struct SqliteWordStore {
    conn: Connection,
}

impl SqliteWordStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        init_schema(&conn)?;
        debug!(path = %path.as_ref().display(), "opened word store");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn query_words<P: Params>(
        &self,
        where_clause: &str,
        params: P,
        sort: Option<SortField>,
    ) -> Result<Vec<WordRecord>> {
        let query = format!("{}{}{}", SELECT_WORDS, where_clause, order_clause(sort));
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(params, row_to_word)?;
        let words = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(words)
    }
}

/// Initialize database with schema
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS words (
            english TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
            thai TEXT NOT NULL,
            category TEXT,
            position INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn row_to_word(row: &Row<'_>) -> rusqlite::Result<WordRecord> {
    Ok(WordRecord {
        english: row.get(0)?,
        thai: row.get(1)?,
        category: row.get(2)?,
    })
}

fn order_clause(sort: Option<SortField>) -> &'static str {
    match sort {
        None => " ORDER BY position ASC",
        Some(SortField::English) => " ORDER BY english COLLATE NOCASE ASC",
        Some(SortField::Thai) => " ORDER BY thai ASC, english COLLATE NOCASE ASC",
        // Uncategorised words go last.
        Some(SortField::Category) => {
            " ORDER BY category IS NULL, category COLLATE NOCASE ASC, english COLLATE NOCASE ASC"
        }
    }
}

fn next_position(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COALESCE(MAX(position), 0) + 1 FROM words", [], |row| {
        row.get(0)
    })
}

fn exists(conn: &Connection, english: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM words WHERE english = ?1",
        params![english],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn insert(conn: &Connection, word: &WordRecord, position: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO words (english, thai, category, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            word.english,
            word.thai,
            word.category,
            position,
            Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn same_key(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl WordStore for SqliteWordStore {
    fn list(&self, sort: Option<SortField>) -> Result<Vec<WordRecord>> {
        self.query_words("", [], sort)
    }

    fn search(&self, term: &str) -> Result<Vec<WordRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list(None);
        }
        self.query_words(
            " WHERE english LIKE ?1 ESCAPE '\\' OR thai LIKE ?1 ESCAPE '\\'",
            params![like_pattern(term)],
            None,
        )
    }

    fn get(&self, english: &str) -> Result<Option<WordRecord>> {
        let mut words = self.query_words(" WHERE english = ?1", params![english.trim()], None)?;
        Ok(words.pop())
    }

    fn by_category(&self, category: &str) -> Result<Vec<WordRecord>> {
        self.query_words(" WHERE category = ?1", params![category.trim()], None)
    }

    fn categories(&self) -> Result<Vec<CategoryInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM words GROUP BY category ORDER BY category IS NULL, category",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CategoryInfo {
                name: row.get(0)?,
                word_count: row.get(1)?,
            })
        })?;
        let categories = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    fn create(&mut self, word: &WordRecord) -> Result<WordRecord> {
        let word = WordRecord::new(&word.english, &word.thai, word.category.as_deref());
        word.validate()?;
        if exists(&self.conn, &word.english)? {
            warn!(english = %word.english, "create rejected, word already stored");
            return Err(DictError::Conflict(format!(
                "คำว่า '{}' มีอยู่แล้ว",
                word.english
            )));
        }
        let position = next_position(&self.conn)?;
        insert(&self.conn, &word, position)?;
        debug!(english = %word.english, "word created");
        Ok(word)
    }

    fn update(&mut self, english: &str, word: &WordRecord) -> Result<WordRecord> {
        let word = WordRecord::new(&word.english, &word.thai, word.category.as_deref());
        word.validate()?;
        if !same_key(english, &word.english) {
            return Err(DictError::InvalidWord(
                "คำศัพท์ไม่ตรงกับที่ต้องการอัพเดท".to_string(),
            ));
        }
        let changed = self.conn.execute(
            "UPDATE words SET english = ?1, thai = ?2, category = ?3 WHERE english = ?4",
            params![word.english, word.thai, word.category, english.trim()],
        )?;
        if changed == 0 {
            return Err(DictError::NotFound(english.trim().to_string()));
        }
        Ok(word)
    }

    fn delete(&mut self, english: &str) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM words WHERE english = ?1", params![english.trim()])?;
        if removed == 0 {
            return Err(DictError::NotFound(english.trim().to_string()));
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM words", [])?;
        info!(removed, "word store cleared");
        Ok(removed)
    }

    fn sort(&mut self, field: SortField) -> Result<Vec<WordRecord>> {
        let words = self.list(Some(field))?;
        let tx = self.conn.transaction()?;
        for (i, word) in words.iter().enumerate() {
            tx.execute(
                "UPDATE words SET position = ?1 WHERE english = ?2",
                params![i as i64 + 1, word.english],
            )?;
        }
        tx.commit()?;
        debug!(%field, count = words.len(), "word order persisted");
        Ok(words)
    }

    fn bulk_create(&mut self, words: &[WordRecord]) -> Result<BulkSummary> {
        let tx = self.conn.transaction()?;
        let mut position = next_position(&tx)?;
        let mut seen = HashSet::new();
        let mut conflicts = Vec::new();

        for (index, word) in words.iter().enumerate() {
            let word = WordRecord::new(&word.english, &word.thai, word.category.as_deref());
            let reason = if word.validate().is_err() {
                Some(ConflictReason::Invalid)
            } else if !seen.insert(word.english.to_ascii_lowercase()) {
                Some(ConflictReason::DuplicateInBatch)
            } else if exists(&tx, &word.english)? {
                Some(ConflictReason::AlreadyStored)
            } else {
                None
            };

            match reason {
                Some(reason) => conflicts.push(RowConflict {
                    index,
                    english: word.english,
                    reason,
                }),
                None => {
                    insert(&tx, &word, position)?;
                    position += 1;
                }
            }
        }

        if !conflicts.is_empty() {
            tx.rollback()?;
            warn!(rows = conflicts.len(), "bulk insert rolled back");
            return Err(DictError::BulkConflict { conflicts });
        }

        tx.commit()?;
        info!(inserted = words.len(), "bulk insert committed");
        Ok(BulkSummary {
            inserted: words.len(),
            message: format!("นำเข้าคำศัพท์ {} คำเรียบร้อยแล้ว", words.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(words: &[(&str, &str, Option<&str>)]) -> SqliteWordStore {
        let mut store = SqliteWordStore::open_in_memory().unwrap();
        for (english, thai, category) in words {
            store
                .create(&WordRecord::new(english, thai, *category))
                .unwrap();
        }
        store
    }

    fn englishes(words: &[WordRecord]) -> Vec<&str> {
        words.iter().map(|w| w.english.as_str()).collect()
    }

    #[test]
    fn create_then_list_keeps_insertion_order() {
        let store = store_with(&[("dog", "สุนัข", None), ("cat", "แมว", Some("animal"))]);
        let words = store.list(None).unwrap();
        assert_eq!(englishes(&words), ["dog", "cat"]);
        assert_eq!(words[1].category.as_deref(), Some("animal"));
    }

    #[test]
    fn duplicate_create_is_conflict_regardless_of_case() {
        let mut store = store_with(&[("Cat", "แมว", None)]);
        let err = store
            .create(&WordRecord::new("cat", "แมว", None))
            .unwrap_err();
        assert!(matches!(err, DictError::Conflict(_)));
        assert!(err.user_message().contains("cat"));
    }

    #[test]
    fn create_rejects_blank_thai() {
        let mut store = SqliteWordStore::open_in_memory().unwrap();
        let err = store.create(&WordRecord::new("cat", " ", None)).unwrap_err();
        assert!(matches!(err, DictError::InvalidWord(_)));
    }

    #[test]
    fn update_requires_matching_key() {
        let mut store = store_with(&[("cat", "แมว", None)]);
        let updated = store
            .update("CAT", &WordRecord::new("cat", "แมวบ้าน", Some("pet")))
            .unwrap();
        assert_eq!(updated.thai, "แมวบ้าน");
        assert_eq!(store.get("cat").unwrap().unwrap().category.as_deref(), Some("pet"));

        let err = store
            .update("cat", &WordRecord::new("dog", "สุนัข", None))
            .unwrap_err();
        assert!(matches!(err, DictError::InvalidWord(_)));

        let err = store
            .update("bird", &WordRecord::new("bird", "นก", None))
            .unwrap_err();
        assert!(matches!(err, DictError::NotFound(_)));
    }

    #[test]
    fn delete_missing_word_is_not_found() {
        let mut store = store_with(&[("cat", "แมว", None)]);
        store.delete("cat").unwrap();
        assert!(matches!(store.delete("cat"), Err(DictError::NotFound(_))));
    }

    #[test]
    fn search_matches_either_language() {
        let store = store_with(&[
            ("cat", "แมว", None),
            ("catalog", "แคตตาล็อก", None),
            ("dog", "สุนัข", None),
        ]);
        assert_eq!(englishes(&store.search("CAT").unwrap()), ["cat", "catalog"]);
        assert_eq!(englishes(&store.search("สุนัข").unwrap()), ["dog"]);
        assert_eq!(store.search("  ").unwrap().len(), 3);
        assert!(store.search("%").unwrap().is_empty());
    }

    #[test]
    fn sort_persists_order() {
        let mut store = store_with(&[
            ("zebra", "ม้าลาย", Some("animal")),
            ("apple", "แอปเปิ้ล", None),
            ("mango", "มะม่วง", Some("fruit")),
        ]);
        let sorted = store.sort(SortField::English).unwrap();
        assert_eq!(englishes(&sorted), ["apple", "mango", "zebra"]);
        assert_eq!(englishes(&store.list(None).unwrap()), ["apple", "mango", "zebra"]);

        let by_category = store.list(Some(SortField::Category)).unwrap();
        assert_eq!(englishes(&by_category), ["zebra", "mango", "apple"]);
    }

    #[test]
    fn categories_count_words() {
        let store = store_with(&[
            ("cat", "แมว", Some("animal")),
            ("dog", "สุนัข", Some("animal")),
            ("run", "วิ่ง", None),
        ]);
        let categories = store.categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name.as_deref(), Some("animal"));
        assert_eq!(categories[0].word_count, 2);
        assert_eq!(categories[1].name, None);
        assert_eq!(store.by_category("animal").unwrap().len(), 2);
    }

    #[test]
    fn bulk_create_inserts_everything() {
        let mut store = store_with(&[("cat", "แมว", None)]);
        let summary = store
            .bulk_create(&[
                WordRecord::new("dog", "สุนัข", None),
                WordRecord::new("bird", "นก", Some("animal")),
            ])
            .unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(englishes(&store.list(None).unwrap()), ["cat", "dog", "bird"]);
    }

    #[test]
    fn bulk_create_is_all_or_nothing() {
        let mut store = store_with(&[("cat", "แมว", None)]);
        let err = store
            .bulk_create(&[
                WordRecord::new("dog", "สุนัข", None),
                WordRecord::new("Cat", "แมว", None),
                WordRecord::new("bird", "นก", None),
                WordRecord::new("DOG", "หมา", None),
            ])
            .unwrap_err();

        match err {
            DictError::BulkConflict { conflicts } => {
                assert_eq!(conflicts.len(), 2);
                assert_eq!(conflicts[0].index, 1);
                assert_eq!(conflicts[0].reason, ConflictReason::AlreadyStored);
                assert_eq!(conflicts[1].index, 3);
                assert_eq!(conflicts[1].reason, ConflictReason::DuplicateInBatch);
            }
            other => panic!("expected bulk conflict, got {other:?}"),
        }
        assert_eq!(englishes(&store.list(None).unwrap()), ["cat"]);
    }

    #[test]
    fn delete_all_reports_count() {
        let mut store = store_with(&[("cat", "แมว", None), ("dog", "สุนัข", None)]);
        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.list(None).unwrap().is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.db");
        {
            let mut store = SqliteWordStore::open(&path).unwrap();
            store.create(&WordRecord::new("cat", "แมว", None)).unwrap();
        }
        let store = SqliteWordStore::open(&path).unwrap();
        assert_eq!(store.list(None).unwrap().len(), 1);
    }
}
