//! Grid placement
//!
//! One parameterized grid for every deck shape. Positions are card centers
//! in view pixels; the match core never looks at them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::{CARD_HEIGHT, CARD_WIDTH};
use crate::sim::{CardId, CardRecord};

/// Outer margin around a two-lane board
const LANE_MARGIN: f32 = 20.0;
/// Space reserved for the title above a two-lane board
const TITLE_HEIGHT: f32 = 100.0;
/// Gap between cells of a two-lane board
const LANE_GAP: f32 = 10.0;
/// Two-lane cards never grow taller than this
const MAX_LANE_CARD_HEIGHT: f32 = 100.0;

/// Grid configuration consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Offset of the grid (before the first padding step)
    pub origin: Vec2,
    /// Cards per row
    pub columns: u32,
    /// Gap added before every column/row
    pub padding: Vec2,
    /// Unscaled card size
    pub card_size: Vec2,
    /// Uniform card scale
    pub card_scale: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin: Vec2::new(200.0, 90.0),
            columns: 2,
            padding: Vec2::new(40.0, 16.0),
            card_size: Vec2::new(CARD_WIDTH, CARD_HEIGHT),
            card_scale: 0.5,
        }
    }
}

impl GridLayout {
    /// Two columns (one per lane) fitted to the view below the title
    pub fn two_lane(view: Vec2, rows: u32) -> Self {
        let rows = rows.max(1) as f32;
        let available = view - Vec2::splat(LANE_MARGIN * 2.0) - Vec2::new(0.0, TITLE_HEIGHT);
        let width = (available.x - LANE_GAP) / 2.0;
        let height = ((available.y - (rows - 1.0) * LANE_GAP) / rows).min(MAX_LANE_CARD_HEIGHT);
        let size = Vec2::new(width, height);

        // Chosen so the first cell center lands at margin + half a card
        let first_center = Vec2::new(LANE_MARGIN, LANE_MARGIN + TITLE_HEIGHT) + size / 2.0;
        Self {
            origin: first_center - Vec2::splat(LANE_GAP),
            columns: 2,
            padding: Vec2::splat(LANE_GAP),
            card_size: size,
            card_scale: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::InvalidGrid("columns must be positive".into()));
        }
        if !(self.card_scale.is_finite() && self.card_scale > 0.0) {
            return Err(ConfigError::InvalidGrid(format!(
                "card scale {} must be positive",
                self.card_scale
            )));
        }
        if !(self.card_size.is_finite() && self.card_size.min_element() > 0.0) {
            return Err(ConfigError::InvalidGrid(format!(
                "card size {:?} must be positive",
                self.card_size
            )));
        }
        Ok(())
    }

    /// On-screen card size
    pub fn scaled_card_size(&self) -> Vec2 {
        self.card_size * self.card_scale
    }

    /// Center of the cell at (column, row)
    pub fn cell_center(&self, column: u32, row: u32) -> Vec2 {
        let cell = Vec2::new(column as f32, row as f32);
        self.origin + self.scaled_card_size() * cell + self.padding * (cell + Vec2::ONE)
    }

    /// Center of the `index`th card in row-major order
    pub fn position(&self, index: usize) -> Vec2 {
        let columns = self.columns.max(1) as usize;
        self.cell_center((index % columns) as u32, (index / columns) as u32)
    }

    /// Place a freshly dealt deck.
    ///
    /// Laned cards go in their lane's column, stacked in deck order; other
    /// cards fill the grid row by row.
    pub fn place(&self, deck: &[CardRecord]) -> Vec<(CardId, Vec2)> {
        let mut lane_rows = [0u32; 2];
        deck.iter()
            .enumerate()
            .map(|(index, card)| {
                let pos = match card.lane {
                    Some(lane) => {
                        let column = lane.column();
                        let row = &mut lane_rows[column as usize];
                        let pos = self.cell_center(column, *row);
                        *row += 1;
                        pos
                    }
                    None => self.position(index),
                };
                (card.id, pos)
            })
            .collect()
    }

    /// Whether `point` falls on the card centered at `center`
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let half = self.scaled_card_size() / 2.0;
        let d = (point - center).abs();
        d.x <= half.x && d.y <= half.y
    }

    /// Card under `point`, if any
    pub fn hit_test(&self, placed: &[(CardId, Vec2)], point: Vec2) -> Option<CardId> {
        placed
            .iter()
            .find(|(_, center)| self.contains(*center, point))
            .map(|(id, _)| *id)
    }
}
