pub mod association;
pub mod codec;
pub mod entity;
pub mod error;
pub mod mutation;
pub mod range;
pub mod schema;
pub mod store;
pub mod value;

pub use association::Association;
pub use codec::{build_row, decode_block, FieldValue, Fields, Record};
pub use entity::{
    resample_curve, Curve, CurveRecord, Input, InputRecord, Model, ModelRecord, ResolvedInput,
    ResolvedModel, SheetEntity,
};
pub use error::{ReferentialError, RunwayError};
pub use mutation::{CellWrite, RowAppend};
pub use range::{col_to_label, CellCoord, CellRange, SheetRange, Span};
pub use schema::SheetKind;
pub use store::Snapshot;
pub use value::CellValue;
