//! Reconciliation engine
//!
//! Given parsed rows plus the target package's existing work orders and
//! sub-packages, decides per row whether it is a duplicate (by normalized
//! OS number) and which sub-package it belongs to (by office key,
//! auto-creating one when nothing matches).
//!
//! Rows are awaited strictly in input order: later rows may match a
//! sub-package created by an earlier row of the same run. The batch is not
//! transactional; the first backend error halts the run and anything
//! already created stays created.

use async_trait::async_trait;
use std::collections::HashSet;

use wo_core::traits::Id;
use wo_db::CreateWorkOrderDto;
use wo_models::{SubPackage, WorkOrder, WorkOrderStatus};

use crate::error::ImportError;
use crate::normalize::{normalize_os_number, OfficeKey};
use crate::parser::ParsedRow;

/// Write seam for the engine, so reconciliation is testable without a
/// database behind it.
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Create a sub-package under the target package, returning its id
    async fn create_sub_package(&self, package_id: Id, name: &str) -> Result<Id, ImportError>;

    /// Create a work order, returning its id
    async fn create_work_order(&self, dto: CreateWorkOrderDto) -> Result<Id, ImportError>;
}

/// The package an import run writes into
#[derive(Debug, Clone)]
pub struct TargetPackage {
    pub id: Id,
    pub name: String,
}

/// Outcome of one import run
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Rows that survived parsing
    pub parsed: usize,
    /// Work orders created
    pub created: usize,
    /// Rows skipped as duplicate OS numbers
    pub skipped: usize,
    /// Sub-packages auto-created during the run
    pub sub_packages_created: usize,
    /// Display name of the target package
    pub package_name: String,
}

impl ImportSummary {
    /// User-facing summary line
    pub fn message(&self) -> String {
        if self.parsed == 0 {
            return "No valid rows found. Check that the header is on row 6.".to_string();
        }
        let mut message = format!(
            "Imported {} tasks into {}.",
            self.created, self.package_name
        );
        if self.skipped > 0 {
            message.push_str(&format!(
                " {} line(s) skipped due to duplicate OS.",
                self.skipped
            ));
        }
        message
    }
}

/// Run the reconciliation pass.
///
/// `sub_packages` is taken by value: the engine appends auto-created
/// sub-packages to it so later rows in the same batch can match them, which
/// also keeps creation idempotent per distinct office key per run.
pub async fn reconcile<S: ImportStore + ?Sized>(
    rows: &[ParsedRow],
    package: &TargetPackage,
    existing_orders: &[WorkOrder],
    sub_packages: Vec<SubPackage>,
    store: &S,
) -> Result<ImportSummary, ImportError> {
    let mut known_os: HashSet<String> = existing_orders
        .iter()
        .filter_map(|order| order.os_number.as_deref())
        .filter_map(normalize_os_number)
        .collect();

    let mut subs: Vec<(Id, String)> = sub_packages
        .into_iter()
        .filter_map(|sub| sub.id.map(|id| (id, sub.name)))
        .collect();

    let mut created = 0usize;
    let mut skipped = 0usize;
    let mut sub_packages_created = 0usize;

    for (position, row) in rows.iter().enumerate() {
        let os_number = row.os_number.as_deref().and_then(normalize_os_number);
        if let Some(ref os) = os_number {
            if known_os.contains(os) {
                skipped += 1;
                continue;
            }
        }

        let office_key = row.office.as_deref().and_then(OfficeKey::derive);
        let sub_package_id = match &office_key {
            Some(key) => match subs.iter().find(|(_, name)| key.matches(name)) {
                Some((id, _)) => Some(*id),
                None => {
                    let name = key.display_name().to_string();
                    let id = store.create_sub_package(package.id, &name).await?;
                    tracing::info!(package_id = package.id, %name, "auto-created sub-package");
                    subs.push((id, name));
                    sub_packages_created += 1;
                    Some(id)
                }
            },
            None => None,
        };

        let title = if !row.title.trim().is_empty() {
            row.title.clone()
        } else if let Some(task) = row.task.as_deref().filter(|t| !t.trim().is_empty()) {
            task.to_string()
        } else {
            "Importado".to_string()
        };

        let dto = CreateWorkOrderDto {
            package_id: package.id,
            sub_package_id,
            title,
            task: row.task.clone(),
            status: WorkOrderStatus::Pending,
            progress: 0,
            office: row.office.clone(),
            os_number: row.os_number.clone(),
            tag: row.tag.clone(),
            machine_name: row.machine_name.clone(),
            responsible: row.responsible.clone(),
            source_row: Some(row.row_number as i32),
            import_order: Some(position as i32),
        };
        store.create_work_order(dto).await?;

        if let Some(os) = os_number {
            known_os.insert(os);
        }
        created += 1;
    }

    let summary = ImportSummary {
        parsed: rows.len(),
        created,
        skipped,
        sub_packages_created,
        package_name: package.name.clone(),
    };
    tracing::info!(
        package_id = package.id,
        created = summary.created,
        skipped = summary.skipped,
        sub_packages_created = summary.sub_packages_created,
        "import run finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store capturing every write
    #[derive(Default)]
    struct MockStore {
        sub_packages: Mutex<Vec<(Id, String)>>,
        work_orders: Mutex<Vec<CreateWorkOrderDto>>,
        fail_work_orders_after: Option<usize>,
    }

    #[async_trait]
    impl ImportStore for MockStore {
        async fn create_sub_package(
            &self,
            _package_id: Id,
            name: &str,
        ) -> Result<Id, ImportError> {
            let mut subs = self.sub_packages.lock().unwrap();
            let id = 100 + subs.len() as Id;
            subs.push((id, name.to_string()));
            Ok(id)
        }

        async fn create_work_order(&self, dto: CreateWorkOrderDto) -> Result<Id, ImportError> {
            let mut orders = self.work_orders.lock().unwrap();
            if let Some(limit) = self.fail_work_orders_after {
                if orders.len() >= limit {
                    return Err(ImportError::Backend("connection reset".into()));
                }
            }
            let id = 1000 + orders.len() as Id;
            orders.push(dto);
            Ok(id)
        }
    }

    fn row(office: Option<&str>, os: Option<&str>, task: &str) -> ParsedRow {
        ParsedRow {
            row_number: 7,
            title: task.to_string(),
            task: Some(task.to_string()),
            office: office.map(String::from),
            os_number: os.map(String::from),
            tag: None,
            machine_name: None,
            responsible: None,
        }
    }

    fn target() -> TargetPackage {
        TargetPackage {
            id: 1,
            name: "Parada Geral".to_string(),
        }
    }

    fn existing_order(os: &str) -> WorkOrder {
        WorkOrder {
            id: Some(500),
            package_id: 1,
            os_number: Some(os.to_string()),
            ..WorkOrder::new("existing", 1)
        }
    }

    fn existing_sub(id: Id, name: &str) -> SubPackage {
        SubPackage {
            id: Some(id),
            ..SubPackage::new(1, name)
        }
    }

    #[tokio::test]
    async fn test_mixed_file_against_empty_package() {
        let rows = vec![
            row(Some("Mecânico"), Some("123"), "Trocar rolamento"),
            row(Some("Elétrico"), Some("456"), "Revisar painel"),
            row(Some("Mecânico"), Some("123"), "Duplicado"),
        ];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &[], vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.sub_packages_created, 2);

        let subs = store.sub_packages.lock().unwrap();
        let names: Vec<&str> = subs.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["Mecânico", "Elétrico"]);

        let orders = store.work_orders.lock().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].sub_package_id, Some(subs[0].0));
        assert_eq!(orders[1].sub_package_id, Some(subs[1].0));
        assert_eq!(orders[0].import_order, Some(0));
        assert_eq!(orders[1].import_order, Some(1));
    }

    #[tokio::test]
    async fn test_rerun_against_populated_package_skips_everything() {
        let rows = vec![
            row(Some("Mecânico"), Some("123"), "Trocar rolamento"),
            row(Some("Elétrico"), Some("456"), "Revisar painel"),
        ];
        let existing = vec![existing_order("123"), existing_order("456")];
        let subs = vec![existing_sub(10, "Mecânico"), existing_sub(11, "Elétrico")];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &existing, subs, &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.sub_packages_created, 0);
        assert!(store.work_orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_detection_is_case_insensitive() {
        let rows = vec![row(None, Some(" os-9 "), "Algo")];
        let existing = vec![existing_order("OS-9")];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &existing, vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[tokio::test]
    async fn test_empty_os_numbers_never_deduplicate() {
        let rows = vec![
            row(None, None, "Primeira sem OS"),
            row(None, None, "Segunda sem OS"),
            row(None, Some("  "), "Terceira com OS em branco"),
        ];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &[], vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 3);
        assert_eq!(summary.skipped, 0);
    }

    #[tokio::test]
    async fn test_at_most_one_sub_package_per_office_key() {
        let rows = vec![
            row(Some("Mecânico"), Some("1"), "A"),
            row(Some("MECANICA"), Some("2"), "B"),
            row(Some("oficina mecânica"), Some("3"), "C"),
        ];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &[], vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 3);
        assert_eq!(summary.sub_packages_created, 1);

        let subs = store.sub_packages.lock().unwrap();
        assert_eq!(subs.len(), 1);
        let orders = store.work_orders.lock().unwrap();
        assert!(orders.iter().all(|o| o.sub_package_id == Some(subs[0].0)));
    }

    #[tokio::test]
    async fn test_custom_office_creates_normalized_sub_package() {
        let rows = vec![row(Some("Hidráulica"), Some("77"), "Trocar mangueira")];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &[], vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.sub_packages_created, 1);
        let subs = store.sub_packages.lock().unwrap();
        assert_eq!(subs[0].1, "hidraulica");
    }

    #[tokio::test]
    async fn test_existing_sub_package_matched_by_substring() {
        let rows = vec![row(Some("MECÂNICO"), Some("1"), "A")];
        let subs = vec![existing_sub(42, "Equipe Mecânica da Parada")];
        let store = MockStore::default();

        let summary = reconcile(&rows, &target(), &[], subs, &store)
            .await
            .unwrap();

        assert_eq!(summary.sub_packages_created, 0);
        let orders = store.work_orders.lock().unwrap();
        assert_eq!(orders[0].sub_package_id, Some(42));
    }

    #[tokio::test]
    async fn test_row_without_office_stays_on_package() {
        let rows = vec![row(None, Some("1"), "Sem oficina")];
        let store = MockStore::default();

        reconcile(&rows, &target(), &[], vec![], &store)
            .await
            .unwrap();

        let orders = store.work_orders.lock().unwrap();
        assert_eq!(orders[0].sub_package_id, None);
        assert_eq!(orders[0].package_id, 1);
    }

    #[tokio::test]
    async fn test_zero_rows_performs_no_writes() {
        let store = MockStore::default();
        let summary = reconcile(&[], &target(), &[], vec![], &store)
            .await
            .unwrap();

        assert_eq!(summary.created, 0);
        assert_eq!(summary.skipped, 0);
        assert!(store.work_orders.lock().unwrap().is_empty());
        assert!(store.sub_packages.lock().unwrap().is_empty());
        assert_eq!(
            summary.message(),
            "No valid rows found. Check that the header is on row 6."
        );
    }

    #[tokio::test]
    async fn test_backend_error_halts_but_keeps_prior_creations() {
        let rows = vec![
            row(None, Some("1"), "A"),
            row(None, Some("2"), "B"),
            row(None, Some("3"), "C"),
        ];
        let store = MockStore {
            fail_work_orders_after: Some(2),
            ..MockStore::default()
        };

        let result = reconcile(&rows, &target(), &[], vec![], &store).await;
        assert!(matches!(result, Err(ImportError::Backend(_))));
        assert_eq!(store.work_orders.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_summary_messages() {
        let summary = ImportSummary {
            parsed: 3,
            created: 2,
            skipped: 1,
            sub_packages_created: 2,
            package_name: "Parada Geral".into(),
        };
        assert_eq!(
            summary.message(),
            "Imported 2 tasks into Parada Geral. 1 line(s) skipped due to duplicate OS."
        );

        let clean = ImportSummary {
            parsed: 2,
            created: 2,
            skipped: 0,
            sub_packages_created: 0,
            package_name: "Parada Geral".into(),
        };
        assert_eq!(clean.message(), "Imported 2 tasks into Parada Geral.");
    }
}
