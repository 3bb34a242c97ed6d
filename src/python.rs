//! Python bindings, built with the `python` feature.

use std::path::Path;
use std::time::{Duration, Instant};

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::db::SqliteWordStore;
use crate::error::{DictError, ErrorKind};
use crate::fuzzy::check_answer;
use crate::import;
use crate::practice::{Outcome, PracticeEngine};
use crate::questions::CHOICE_COUNT;
use crate::quiz::{AnswerResult, QuizEngine};
use crate::store::WordStore;
use crate::word::{CategoryInfo, SortField, WordRecord};

fn to_py_err(e: DictError) -> PyErr {
    match e.kind() {
        ErrorKind::Validation | ErrorKind::Conflict => PyValueError::new_err(e.to_string()),
        ErrorKind::Connectivity | ErrorKind::Engine => PyRuntimeError::new_err(e.to_string()),
    }
}

#[pymethods]
impl WordRecord {
    #[new]
    #[pyo3(signature = (english, thai, category=None))]
    fn py_new(english: &str, thai: &str, category: Option<&str>) -> Self {
        WordRecord::new(english, thai, category)
    }

    fn __repr__(&self) -> String {
        format!(
            "WordRecord(english='{}', thai='{}', category='{}')",
            self.english,
            self.thai,
            self.category_label()
        )
    }
}

/// Parse CSV text, returning the accepted words and the rejected-row count
#[pyfunction]
#[pyo3(name = "parse_import")]
pub fn py_parse_import(text: &str) -> PyResult<(Vec<WordRecord>, usize)> {
    let batch = import::parse(text).map_err(to_py_err)?;
    let rejected = batch.rejected_count();
    Ok((batch.accepted, rejected))
}

#[pyfunction]
#[pyo3(name = "import_file")]
pub fn py_import_file(file_path: &str, db_path: &str) -> PyResult<usize> {
    let batch = import::parse_file(Path::new(file_path)).map_err(to_py_err)?;
    let mut store = SqliteWordStore::open(db_path).map_err(to_py_err)?;
    let summary = import::confirm_import(&mut store, batch).map_err(to_py_err)?;
    Ok(summary.inserted)
}

#[pyfunction]
#[pyo3(name = "list_words", signature = (db_path, sort_by=None))]
pub fn py_list_words(db_path: &str, sort_by: Option<&str>) -> PyResult<Vec<WordRecord>> {
    let sort = sort_by
        .map(str::parse::<SortField>)
        .transpose()
        .map_err(to_py_err)?;
    let store = SqliteWordStore::open(db_path).map_err(to_py_err)?;
    store.list(sort).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "search_words")]
pub fn py_search_words(db_path: &str, term: &str) -> PyResult<Vec<WordRecord>> {
    let store = SqliteWordStore::open(db_path).map_err(to_py_err)?;
    store.search(term).map_err(to_py_err)
}

#[pyfunction]
#[pyo3(name = "get_categories")]
pub fn py_get_categories(db_path: &str) -> PyResult<Vec<CategoryInfo>> {
    let store = SqliteWordStore::open(db_path).map_err(to_py_err)?;
    store.categories().map_err(to_py_err)
}

/// Returns `(is_correct, similarity, distance)`
#[pyfunction]
#[pyo3(name = "check_answer")]
pub fn py_check_answer(user_input: &str, expected: &str) -> (bool, f64, usize) {
    let check = check_answer(user_input, expected);
    (check.is_correct, check.similarity, check.distance)
}

#[pyclass(name = "PracticeSession")]
pub struct PyPracticeSession {
    inner: PracticeEngine,
}

#[pymethods]
impl PyPracticeSession {
    #[new]
    #[pyo3(signature = (words, delay_ms=1500))]
    fn py_new(words: Vec<WordRecord>, delay_ms: u64) -> Self {
        Self {
            inner: PracticeEngine::with_rng(
                words,
                Duration::from_millis(delay_ms),
                StdRng::from_entropy(),
            ),
        }
    }

    fn prompt(&self) -> Option<String> {
        self.inner.prompt().map(str::to_string)
    }

    fn submit(&mut self, answer: &str) -> PyResult<bool> {
        let outcome = self
            .inner
            .submit_answer(answer, Instant::now())
            .map_err(to_py_err)?;
        Ok(outcome == Outcome::Correct)
    }

    fn skip(&mut self) -> PyResult<()> {
        self.inner.skip().map_err(to_py_err)
    }

    fn poll(&mut self) -> bool {
        self.inner.poll(Instant::now())
    }

    fn toggle_direction(&mut self) {
        self.inner.toggle_direction();
    }

    fn feedback(&self) -> Option<String> {
        self.inner.feedback().map(|f| f.message())
    }

    #[getter]
    fn direction(&self) -> &'static str {
        self.inner.direction().label()
    }

    #[getter]
    fn remaining(&self) -> usize {
        self.inner.remaining_count()
    }

    fn replace_words(&mut self, words: Vec<WordRecord>) {
        self.inner.replace_words(words);
    }
}

#[pyclass(name = "QuizSession")]
pub struct PyQuizSession {
    inner: QuizEngine,
}

#[pymethods]
impl PyQuizSession {
    #[new]
    #[pyo3(signature = (words, delay_ms=1500))]
    fn py_new(words: Vec<WordRecord>, delay_ms: u64) -> Self {
        Self {
            inner: QuizEngine::with_rng(words, Duration::from_millis(delay_ms), StdRng::from_entropy()),
        }
    }

    fn prompt(&self) -> Option<String> {
        self.inner.question().map(|q| q.prompt())
    }

    /// `(id, text)` pairs in display order
    fn choices(&self) -> Vec<(usize, String)> {
        self.inner
            .question()
            .map(|q| q.choices.iter().map(|c| (c.id, c.text.clone())).collect())
            .unwrap_or_default()
    }

    /// `True`/`False` for a judged answer, `None` if it was ignored
    fn answer(&mut self, choice_id: usize) -> PyResult<Option<bool>> {
        let result = self
            .inner
            .answer(choice_id, Instant::now())
            .map_err(to_py_err)?;
        Ok(match result {
            AnswerResult::Correct => Some(true),
            AnswerResult::Incorrect => Some(false),
            AnswerResult::Ignored => None,
        })
    }

    fn poll(&mut self) -> bool {
        self.inner.poll(Instant::now())
    }

    fn restart(&mut self) -> PyResult<()> {
        self.inner.restart().map_err(to_py_err)
    }

    fn feedback(&self) -> Option<String> {
        self.inner.feedback().map(|f| f.message())
    }

    #[getter]
    fn score(&self) -> usize {
        self.inner.score()
    }

    #[getter]
    fn answered(&self) -> usize {
        self.inner.answered_count()
    }

    #[getter]
    fn remaining(&self) -> usize {
        self.inner.remaining_count()
    }

    #[classattr]
    fn choice_count() -> usize {
        CHOICE_COUNT
    }
}

/// Register everything on the extension module.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_parse_import, m)?)?;
    m.add_function(wrap_pyfunction!(py_import_file, m)?)?;
    m.add_function(wrap_pyfunction!(py_list_words, m)?)?;
    m.add_function(wrap_pyfunction!(py_search_words, m)?)?;
    m.add_function(wrap_pyfunction!(py_get_categories, m)?)?;
    m.add_function(wrap_pyfunction!(py_check_answer, m)?)?;

    m.add_class::<WordRecord>()?;
    m.add_class::<CategoryInfo>()?;
    m.add_class::<PyPracticeSession>()?;
    m.add_class::<PyQuizSession>()?;

    Ok(())
}
