use std::collections::BTreeMap;

use crate::codec::{decode_block, Record};
use crate::entity::{
    Curve, CurveRecord, InputRecord, ModelRecord, ResolvedInput, ResolvedModel, SheetEntity,
};
use crate::error::ReferentialError;
use crate::value::CellValue;

/// An immutable view of the three entity sheets at one point in time.
///
/// A reload builds a new snapshot; nothing patches an existing one. Every
/// dereference names the snapshot it was made against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    models: BTreeMap<usize, ModelRecord>,
    inputs: BTreeMap<usize, InputRecord>,
    curves: BTreeMap<usize, Curve>,
}

impl Snapshot {
    /// Build a snapshot from the raw header-first blocks of each sheet
    pub fn from_blocks(
        models: &[Vec<CellValue>],
        inputs: &[Vec<CellValue>],
        curves: &[Vec<CellValue>],
    ) -> Self {
        Self {
            models: decode_entities::<ModelRecord>(models),
            inputs: decode_entities::<InputRecord>(inputs),
            curves: decode_entities::<CurveRecord>(curves)
                .into_iter()
                .map(|(number, record)| (number, record.resample()))
                .collect(),
        }
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelRecord> {
        self.models.values()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputRecord> {
        self.inputs.values()
    }

    pub fn curves(&self) -> impl Iterator<Item = &Curve> {
        self.curves.values()
    }

    pub fn model(&self, number: usize) -> Option<&ModelRecord> {
        self.models.get(&number)
    }

    pub fn input(&self, number: usize) -> Option<&InputRecord> {
        self.inputs.get(&number)
    }

    pub fn curve(&self, number: usize) -> Option<&Curve> {
        self.curves.get(&number)
    }

    /// (models, inputs, curves)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.models.len(), self.inputs.len(), self.curves.len())
    }

    /// Input with its curve links replaced by the curves themselves
    pub fn deref_input(&self, number: usize) -> Result<ResolvedInput, ReferentialError> {
        let input = self
            .inputs
            .get(&number)
            .ok_or(ReferentialError::MissingInput(number))?;
        self.resolve_input(input)
    }

    /// Model with every input and each input's curves resolved
    pub fn deref_model(&self, number: usize) -> Result<ResolvedModel, ReferentialError> {
        let model = self
            .models
            .get(&number)
            .ok_or(ReferentialError::MissingModel(number))?;

        let inputs = model
            .inputs
            .ids()
            .iter()
            .map(|&key| {
                let input = self.inputs.get(&key).ok_or(ReferentialError::DanglingInput {
                    model: model.number,
                    input: key,
                })?;
                self.resolve_input(input)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(model.with_inputs(inputs))
    }

    /// Resolve every model, failing on the first broken reference
    pub fn deref_models(&self) -> Result<Vec<ResolvedModel>, ReferentialError> {
        self.models.keys().map(|&n| self.deref_model(n)).collect()
    }

    fn resolve_input(&self, input: &InputRecord) -> Result<ResolvedInput, ReferentialError> {
        let curves = input
            .curves
            .ids()
            .iter()
            .map(|&key| {
                self.curves
                    .get(&key)
                    .cloned()
                    .ok_or(ReferentialError::DanglingCurve {
                        input: input.number,
                        curve: key,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(input.with_curves(curves))
    }
}

/// Decode a sheet into row-number keyed entities.
///
/// The association column is normalized to a list before the entity sees it.
fn decode_entities<E: SheetEntity>(block: &[Vec<CellValue>]) -> BTreeMap<usize, E> {
    decode_block(block)
        .into_iter()
        .map(|mut record: Record| {
            record.normalize_list(E::SHEET.association_field());
            (record.number, E::from_record(&record))
        })
        .collect()
}
