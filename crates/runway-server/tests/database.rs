use std::sync::Arc;

use runway_core::{
    Association, CellValue, CurveRecord, Input, InputRecord, ModelRecord, RunwayError, SheetKind,
};
use runway_server::db::{Database, MemorySheets};
use runway_server::error::AppError;
use runway_sim::{simulate, RunParams};

fn n(v: f64) -> CellValue {
    CellValue::Number(v)
}

fn store() -> (Arc<MemorySheets>, Database) {
    let sheets = Arc::new(MemorySheets::with_schema());
    let db = Database::new(sheets.clone());
    (sheets, db)
}

fn flat_input(name: &str, size: f64, seed: f64) -> InputRecord {
    Input {
        number: 0,
        name: name.to_string(),
        notes: String::new(),
        frequency: 1.0,
        size,
        growth_percent: 0.0,
        growth_freq: 0.0,
        saturation: 0.0,
        seed,
        variability: 0.0,
        curves: Association::default(),
    }
}

fn model(name: &str, inputs: &[usize]) -> ModelRecord {
    ModelRecord {
        number: 0,
        name: name.to_string(),
        default_days: 10,
        default_offset: 0,
        inputs: Association::new(inputs.iter().copied()),
    }
}

#[tokio::test]
async fn test_create_link_and_resolve() {
    let (sheets, db) = store();

    let curve = db
        .create_curve(&CurveRecord {
            number: 0,
            name: "Weekly".to_string(),
            period: 7,
            curve: vec![1.0, 2.0],
        })
        .await
        .unwrap();
    let retail = db.create_input(&flat_input("Retail", 10.0, 5.0)).await.unwrap();
    let rent = db.create_input(&flat_input("Rent", -4.0, 1.0)).await.unwrap();
    let base = db.create_model(&model("Base", &[retail])).await.unwrap();
    assert_eq!((curve, retail, rent, base), (1, 1, 2, 1));

    db.link_input(base, rent).await.unwrap();
    db.link_curve(retail, curve).await.unwrap();

    let models = sheets.rows(SheetKind::Models).await;
    assert_eq!(models[1], vec![CellValue::from("Base"), n(10.0), n(0.0), n(1.0), n(2.0)]);

    let snapshot = db.reload().await.unwrap();
    let resolved = snapshot.deref_model(base).unwrap();
    assert_eq!(resolved.inputs.len(), 2);
    assert_eq!(resolved.inputs[0].curves[0].curve.len(), 7);
    assert_eq!(resolved.inputs[1].name, "Rent");
}

#[tokio::test]
async fn test_mutations_do_not_patch_snapshot() {
    let (_sheets, db) = store();
    db.reload().await.unwrap();

    db.create_model(&model("Base", &[])).await.unwrap();
    assert_eq!(db.snapshot().await.counts(), (0, 0, 0));

    db.reload().await.unwrap();
    assert_eq!(db.snapshot().await.counts(), (1, 0, 0));
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let (_sheets, db) = store();
    let input = db.create_input(&flat_input("Retail", 10.0, 5.0)).await.unwrap();
    db.create_model(&model("Base", &[input])).await.unwrap();

    let first = db.reload().await.unwrap();
    let second = db.reload().await.unwrap();
    assert_eq!(*first, *second);
    assert_eq!(first.deref_models().unwrap(), second.deref_models().unwrap());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_snapshot() {
    let sheets = Arc::new(MemorySheets::new());
    let db = Database::new(sheets.clone());
    let header = |kind: SheetKind| -> Vec<CellValue> {
        kind.headers().iter().map(|h| CellValue::from(*h)).collect()
    };

    sheets
        .set_rows(
            SheetKind::Models,
            vec![header(SheetKind::Models), vec![CellValue::from("Base"), n(5.0)]],
        )
        .await;
    sheets.set_rows(SheetKind::Inputs, vec![header(SheetKind::Inputs)]).await;

    // Curves sheet is missing, so nothing from this reload may be installed
    assert!(matches!(db.reload().await, Err(AppError::Backend(_))));
    assert_eq!(db.snapshot().await.counts(), (0, 0, 0));

    sheets.set_rows(SheetKind::Curves, vec![header(SheetKind::Curves)]).await;
    db.reload().await.unwrap();
    assert_eq!(db.snapshot().await.counts(), (1, 0, 0));
}

#[tokio::test]
async fn test_update_clears_stale_associations() {
    let (sheets, db) = store();
    let base = db.create_model(&model("Base", &[1, 2, 3])).await.unwrap();

    db.update(base, &model("Renamed", &[2])).await.unwrap();

    let snapshot = db.reload().await.unwrap();
    let record = snapshot.model(base).unwrap();
    assert_eq!(record.name, "Renamed");
    assert_eq!(record.inputs.ids(), &[2]);
    assert_eq!(sheets.rows(SheetKind::Models).await[1].len(), 4);
}

#[tokio::test]
async fn test_remove_association() {
    let (sheets, db) = store();
    let base = db.create_model(&model("Base", &[4, 5, 4])).await.unwrap();

    db.unlink_input(base, 4).await.unwrap();
    let row = &sheets.rows(SheetKind::Models).await[1];
    assert_eq!(&row[3..], &[n(5.0), n(4.0)]);

    let err = db.unlink_input(base, 9).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Store(RunwayError::AssociationNotFound { key: 9, .. })
    ));
    // The failed removal wrote nothing
    assert_eq!(&sheets.rows(SheetKind::Models).await[1][3..], &[n(5.0), n(4.0)]);
}

#[tokio::test]
async fn test_delete_shifts_row_numbers() {
    let (_sheets, db) = store();
    db.create_model(&model("First", &[])).await.unwrap();
    db.create_model(&model("Second", &[])).await.unwrap();

    db.delete_row(SheetKind::Models, 1).await.unwrap();
    let snapshot = db.reload().await.unwrap();
    assert_eq!(snapshot.model(1).map(|m| m.name.as_str()), Some("Second"));
    assert!(snapshot.model(2).is_none());

    let err = db.delete_row(SheetKind::Models, 5).await.unwrap_err();
    assert!(matches!(err, AppError::Store(RunwayError::RowNotFound { row: 5, .. })));
}

#[tokio::test]
async fn test_dangling_link_surfaces_on_deref() {
    let (_sheets, db) = store();
    let base = db.create_model(&model("Base", &[])).await.unwrap();
    db.link_input(base, 42).await.unwrap();

    let snapshot = db.reload().await.unwrap();
    assert!(snapshot.deref_model(base).is_err());
}

#[tokio::test]
async fn test_projection_from_store() {
    let (_sheets, db) = store();
    let input = db.create_input(&flat_input("Retail", 10.0, 5.0)).await.unwrap();
    let base = db.create_model(&model("Base", &[input])).await.unwrap();

    let snapshot = db.reload().await.unwrap();
    let projection =
        simulate(&snapshot.deref_model(base).unwrap(), &RunParams::default()).unwrap();

    assert_eq!(projection.mid.series.len(), 10);
    assert_eq!(projection.mid.profit, 500.0);
    assert_eq!(projection.mid.loss, 0.0);
}
