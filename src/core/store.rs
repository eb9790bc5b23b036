use crate::domain::model::{GradeSelections, TermSelections};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Key the selections are persisted under.
pub const STORAGE_KEY: &str = "uninest-gpa-grades";

/// Write-through persistence for the user's grade choices. Every change is
/// saved immediately as one wholesale write.
pub struct GradeSelectionStore<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> GradeSelectionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 缺少、無法讀取或格式不符的資料一律視為空白。
    /// 只要有一個欄位不符，整份資料都會被捨棄，下一次 `save` 會覆蓋掉它。
    pub fn load(&self) -> GradeSelections {
        let data = match self.storage.read_entry(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return GradeSelections::default(),
            Err(e) => {
                tracing::warn!("Could not read stored grades '{}': {}", self.key, e);
                return GradeSelections::default();
            }
        };

        match serde_json::from_slice(&data) {
            Ok(selections) => selections,
            Err(e) => {
                tracing::warn!("Ignoring malformed stored grades '{}': {}", self.key, e);
                GradeSelections::default()
            }
        }
    }

    /// Replaces whatever was stored before.
    pub fn save(&self, selections: &GradeSelections) -> Result<()> {
        let data = serde_json::to_vec(selections)?;
        self.storage.write_entry(&self.key, &data)?;
        tracing::debug!("Saved grade selections ({} bytes)", data.len());
        Ok(())
    }

    /// A `None` or empty letter clears the subject. Returns the saved state.
    pub fn set_grade(
        &self,
        year: &str,
        term: &str,
        subject: &str,
        letter: Option<&str>,
    ) -> Result<GradeSelections> {
        let mut selections = self.load();

        match letter.filter(|l| !l.is_empty()) {
            Some(letter) => {
                tracing::debug!("{} / {} / {} -> {}", year, term, subject, letter);
                selections.set(year, term, subject, letter);
            }
            None => {
                tracing::debug!("{} / {} / {} cleared", year, term, subject);
                selections.remove(year, term, subject);
            }
        }

        self.save(&selections)?;
        Ok(selections)
    }

    pub fn term_selections(&self, year: &str, term: &str) -> TermSelections {
        self.load().term(year, term).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::utils::error::GpaError;

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read_entry(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(GpaError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read denied",
            )))
        }

        fn write_entry(&self, _key: &str, _data: &[u8]) -> Result<()> {
            Err(GpaError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }
    }

    #[test]
    fn test_empty_storage_loads_empty() {
        let store = GradeSelectionStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_set_grade_round_trips() {
        let store = GradeSelectionStore::new(MemoryStorage::new());

        store
            .set_grade("2025", "Semester 1", "Data Structures", Some("B+"))
            .unwrap();
        assert_eq!(
            store.load().letter("2025", "Semester 1", "Data Structures"),
            Some("B+")
        );

        store
            .set_grade("2025", "Semester 1", "Data Structures", None)
            .unwrap();
        assert!(store.term_selections("2025", "Semester 1").is_empty());
    }

    #[test]
    fn test_empty_letter_clears() {
        let store = GradeSelectionStore::new(MemoryStorage::new());
        store.set_grade("2024", "Semester 2", "Physics", Some("A")).unwrap();
        store.set_grade("2024", "Semester 2", "Physics", Some("")).unwrap();
        assert_eq!(store.load().letter("2024", "Semester 2", "Physics"), None);
    }

    #[test]
    fn test_every_change_is_persisted() {
        let storage = MemoryStorage::new();
        let store = GradeSelectionStore::new(storage.clone());

        store.set_grade("2024", "Semester 1", "History", Some("A-")).unwrap();

        let raw = storage.get_raw(STORAGE_KEY).unwrap();
        let persisted: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            persisted,
            serde_json::json!({"2024": {"Semester 1": {"History": "A-"}}})
        );
    }

    #[test]
    fn test_unexpected_shape_loads_empty() {
        let storage = MemoryStorage::new();
        let store = GradeSelectionStore::new(storage.clone());

        for raw in [
            r#""just a string""#,
            "null",
            "[1, 2, 3]",
            r#"{"2024": {"Semester 1": {"History": 4}}}"#,
            "{not json",
            "",
        ] {
            storage.insert_raw(STORAGE_KEY, raw);
            assert!(store.load().is_empty(), "expected empty for {:?}", raw);
        }
    }

    #[test]
    fn test_one_malformed_leaf_discards_all_stored_grades() {
        let storage = MemoryStorage::new();
        let store = GradeSelectionStore::new(storage.clone());
        storage.insert_raw(
            STORAGE_KEY,
            r#"{"2024":{"Semester 1":{"History":"A"}},"meta":{"v":{"x":1}}}"#,
        );

        // 整份資料視為空白，下一次寫入會覆蓋掉原本有效的 2024 成績
        assert!(store.load().is_empty());
        store
            .set_grade("2025", "Semester 1", "Data Structures", Some("B"))
            .unwrap();

        let persisted: serde_json::Value =
            serde_json::from_slice(&storage.get_raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(
            persisted,
            serde_json::json!({"2025": {"Semester 1": {"Data Structures": "B"}}})
        );
    }

    #[test]
    fn test_read_failure_loads_empty_and_write_failure_surfaces() {
        let store = GradeSelectionStore::new(FailingStorage);
        assert!(store.load().is_empty());
        assert!(matches!(
            store.set_grade("2024", "Semester 1", "History", Some("A")),
            Err(GpaError::IoError(_))
        ));
    }
}
