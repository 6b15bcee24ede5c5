//! Python bindings for gramtool.
//!
//! ```python
//! from _gramtool import GramTool
//!
//! gt = GramTool("data", "lt")
//! gt.get_lemma("Šiaulių banko")                       # 'Šiaulių bankas'
//! gt.change_form("medis", case="accusative", number="plural")  # 'medžius'
//! gt.describe("nmsg")  # {'pos': 'noun', 'gender': 'masculine', ...}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use gramtool::{Error, GramTool, Speller};
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing::debug;

create_exception!(
    _gramtool,
    SetupError,
    PyException,
    "A data file is missing, unreadable or malformed."
);
create_exception!(
    _gramtool,
    GrammarSyntaxError,
    PyException,
    "The rule source does not compile."
);

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Setup { .. } | Error::SymbolTable { .. } => SetupError::new_err(err.to_string()),
        Error::Syntax(err) => GrammarSyntaxError::new_err(err.report()),
        Error::Spec(err) => PyValueError::new_err(err.to_string()),
    }
}

/// A Python callable `str -> bool` used as the spelling oracle. Exceptions
/// count as a rejection.
struct PySpeller {
    callable: Py<PyAny>,
}

impl Speller for PySpeller {
    fn is_valid_word(&self, word: &str) -> bool {
        Python::with_gil(|py| {
            match self.callable.bind(py).call1((word,)).and_then(|r| r.is_truthy()) {
                Ok(valid) => valid,
                Err(err) => {
                    debug!(word, error = %err, "python speller raised");
                    false
                }
            }
        })
    }
}

fn properties(kwargs: Option<&Bound<'_, PyDict>>) -> PyResult<Vec<(String, String)>> {
    kwargs
        .into_iter()
        .flat_map(|dict| dict.iter())
        .map(|(key, value)| Ok((key.extract()?, value.extract()?)))
        .collect()
}

fn borrowed(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Lemmatizer and form synthesizer over one language's data directory.
#[pyclass(name = "GramTool", frozen)]
struct PyGramTool {
    inner: GramTool,
}

#[pymethods]
impl PyGramTool {
    #[new]
    #[pyo3(signature = (data_dir, language = "lt", speller = None))]
    fn new(data_dir: PathBuf, language: &str, speller: Option<Py<PyAny>>) -> Self {
        let mut inner = GramTool::new(data_dir, language);
        if let Some(callable) = speller {
            inner = inner.with_speller(Arc::new(PySpeller { callable }));
        }
        Self { inner }
    }

    /// Lemmatize the last word of a phrase, keeping the others.
    fn get_lemma(&self, phrase: &str) -> PyResult<Option<String>> {
        self.inner.lemma_of_phrase(phrase).map_err(to_py_err)
    }

    /// The most frequent lemma of a single word.
    fn lemma(&self, word: &str) -> PyResult<Option<String>> {
        self.inner.lemma_of(word).map_err(to_py_err)
    }

    /// Re-inflect a word, e.g. `change_form("medis", case="accusative")`.
    #[pyo3(signature = (word, **properties))]
    fn change_form(
        &self,
        word: &str,
        properties: Option<&Bound<'_, PyDict>>,
    ) -> PyResult<Option<String>> {
        let pairs = self::properties(properties)?;
        self.inner
            .change_form(word, &borrowed(&pairs))
            .map_err(to_py_err)
    }

    /// Check whether a spec carries the given property values.
    #[pyo3(signature = (spec, **properties))]
    fn check(&self, spec: &str, properties: Option<&Bound<'_, PyDict>>) -> PyResult<bool> {
        let pairs = self::properties(properties)?;
        self.inner.check(spec, &borrowed(&pairs)).map_err(to_py_err)
    }

    /// Describe a spec as an ordered `{property: value}` dict.
    fn describe<'py>(&self, py: Python<'py>, spec: &str) -> PyResult<Bound<'py, PyDict>> {
        let description = self.inner.describe(spec).map_err(to_py_err)?;
        let dict = PyDict::new(py);
        for (property, value) in description {
            dict.set_item(property, value)?;
        }
        Ok(dict)
    }

    /// Every accepted paradigm of a word as `(rule, [(spec, surface)])`.
    fn forms(&self, word: &str) -> PyResult<Vec<(String, Vec<(String, String)>)>> {
        let paradigms = self.inner.forms_of(word).map_err(to_py_err)?;
        Ok(paradigms.into_iter().map(|p| (p.rule, p.forms)).collect())
    }

    /// Spelling suggestions for a word.
    fn suggest(&self, word: &str) -> PyResult<Vec<String>> {
        self.inner.suggest(word).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "GramTool(data_dir='{}', language='{}')",
            self.inner.data_dir().display(),
            self.inner.language()
        )
    }
}

/// gramtool Python module.
#[pymodule]
fn _gramtool(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGramTool>()?;
    m.add("SetupError", m.py().get_type::<SetupError>())?;
    m.add("GrammarSyntaxError", m.py().get_type::<GrammarSyntaxError>())?;
    Ok(())
}
