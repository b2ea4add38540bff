pub mod backend;
pub mod http;
pub mod memory;

use std::sync::Arc;
use tokio::sync::RwLock;

use runway_core::mutation::{
    plan_add_association, plan_create, plan_delete, plan_remove_association, plan_update,
};
use runway_core::{
    CellValue, CurveRecord, Fields, InputRecord, ModelRecord, SheetEntity, SheetKind, SheetRange,
    Snapshot,
};

use crate::config::{BackendConfig, Config};
use crate::error::AppError;
pub use backend::{BackendError, SheetBackend};
pub use http::HttpSheets;
pub use memory::MemorySheets;

/// Spreadsheet-backed entity store.
///
/// Holds the backend handle and the most recent snapshot. Mutations write
/// straight through and leave the snapshot alone; call [`Database::reload`]
/// before trusting a fresh dereference.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn SheetBackend>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
}

impl Database {
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self {
            backend,
            snapshot: Arc::new(RwLock::new(Arc::new(Snapshot::default()))),
        }
    }

    /// Build the backend described by the configuration
    pub fn connect(config: &Config) -> Self {
        let backend: Arc<dyn SheetBackend> = match &config.backend {
            BackendConfig::Memory => Arc::new(MemorySheets::with_schema()),
            BackendConfig::Http {
                api_base,
                spreadsheet_id,
                access_token,
            } => Arc::new(HttpSheets::new(
                api_base.as_str(),
                spreadsheet_id.as_str(),
                access_token.as_str(),
            )),
        };
        Self::new(backend)
    }

    /// Re-fetch all three sheets and replace the snapshot.
    ///
    /// Any failed fetch fails the reload and the previous snapshot stays.
    pub async fn reload(&self) -> Result<Arc<Snapshot>, AppError> {
        let (models, inputs, curves) = futures::future::try_join3(
            self.read_sheet(SheetKind::Models),
            self.read_sheet(SheetKind::Inputs),
            self.read_sheet(SheetKind::Curves),
        )
        .await?;

        let snapshot = Arc::new(Snapshot::from_blocks(&models, &inputs, &curves));
        let (m, i, c) = snapshot.counts();
        tracing::info!(models = m, inputs = i, curves = c, "reloaded entity sheets");

        *self.snapshot.write().await = Arc::clone(&snapshot);
        Ok(snapshot)
    }

    /// The snapshot produced by the latest successful reload
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    async fn read_sheet(&self, sheet: SheetKind) -> Result<Vec<Vec<CellValue>>, BackendError> {
        self.backend.read_range(&SheetRange::sheet(sheet)).await
    }

    /// Append a row; returns its data row number
    pub async fn create_row(
        &self,
        sheet: SheetKind,
        fields: &Fields,
        overflow: &[CellValue],
    ) -> Result<usize, AppError> {
        let block = self.read_sheet(sheet).await?;
        let plan = plan_create(sheet, &block, fields, overflow)?;

        self.backend.append_row(plan.sheet, plan.values).await?;
        tracing::info!(sheet = %sheet, row = plan.number, "created row");
        Ok(plan.number)
    }

    pub async fn update_row(
        &self,
        sheet: SheetKind,
        number: usize,
        fields: &Fields,
        overflow: &[CellValue],
    ) -> Result<(), AppError> {
        let block = self.read_sheet(sheet).await?;
        let plan = plan_update(sheet, &block, number, fields, overflow)?;

        self.backend.write_range(&plan.range, vec![plan.values]).await?;
        tracing::info!(sheet = %sheet, row = number, "updated row");
        Ok(())
    }

    /// Remove a row outright; later rows shift up and change number
    pub async fn delete_row(&self, sheet: SheetKind, number: usize) -> Result<(), AppError> {
        let block = self.read_sheet(sheet).await?;
        let (start, end) = plan_delete(sheet, &block, number)?;

        let sheet_id = self.backend.sheet_id(sheet).await?;
        self.backend.delete_rows(sheet_id, start, end).await?;
        tracing::info!(sheet = %sheet, row = number, "deleted row");
        Ok(())
    }

    pub async fn add_association(
        &self,
        sheet: SheetKind,
        number: usize,
        key: usize,
    ) -> Result<(), AppError> {
        let block = self.read_sheet(sheet).await?;
        let plan = plan_add_association(sheet, &block, number, key)?;

        self.backend.write_range(&plan.range, vec![plan.values]).await?;
        tracing::info!(sheet = %sheet, row = number, key, "added association");
        Ok(())
    }

    /// Fails if the association is not there
    pub async fn remove_association(
        &self,
        sheet: SheetKind,
        number: usize,
        key: usize,
    ) -> Result<(), AppError> {
        let block = self.read_sheet(sheet).await?;
        let plan = plan_remove_association(sheet, &block, number, key)?;

        self.backend.write_range(&plan.range, vec![plan.values]).await?;
        tracing::info!(sheet = %sheet, row = number, key, "removed association");
        Ok(())
    }

    pub async fn create<E: SheetEntity>(&self, entity: &E) -> Result<usize, AppError> {
        self.create_row(E::SHEET, &entity.to_fields(), &entity.overflow())
            .await
    }

    pub async fn update<E: SheetEntity>(&self, number: usize, entity: &E) -> Result<(), AppError> {
        self.update_row(E::SHEET, number, &entity.to_fields(), &entity.overflow())
            .await
    }

    pub async fn create_model(&self, model: &ModelRecord) -> Result<usize, AppError> {
        self.create(model).await
    }

    pub async fn create_input(&self, input: &InputRecord) -> Result<usize, AppError> {
        self.create(input).await
    }

    pub async fn create_curve(&self, curve: &CurveRecord) -> Result<usize, AppError> {
        self.create(curve).await
    }

    pub async fn update_model(&self, number: usize, model: &ModelRecord) -> Result<(), AppError> {
        self.update(number, model).await
    }

    pub async fn update_input(&self, number: usize, input: &InputRecord) -> Result<(), AppError> {
        self.update(number, input).await
    }

    pub async fn update_curve(&self, number: usize, curve: &CurveRecord) -> Result<(), AppError> {
        self.update(number, curve).await
    }

    pub async fn delete_model(&self, number: usize) -> Result<(), AppError> {
        self.delete_row(SheetKind::Models, number).await
    }

    pub async fn delete_input(&self, number: usize) -> Result<(), AppError> {
        self.delete_row(SheetKind::Inputs, number).await
    }

    pub async fn delete_curve(&self, number: usize) -> Result<(), AppError> {
        self.delete_row(SheetKind::Curves, number).await
    }

    pub async fn link_input(&self, model: usize, input: usize) -> Result<(), AppError> {
        self.add_association(SheetKind::Models, model, input).await
    }

    pub async fn unlink_input(&self, model: usize, input: usize) -> Result<(), AppError> {
        self.remove_association(SheetKind::Models, model, input)
            .await
    }

    pub async fn link_curve(&self, input: usize, curve: usize) -> Result<(), AppError> {
        self.add_association(SheetKind::Inputs, input, curve).await
    }

    pub async fn unlink_curve(&self, input: usize, curve: usize) -> Result<(), AppError> {
        self.remove_association(SheetKind::Inputs, input, curve)
            .await
    }
}
