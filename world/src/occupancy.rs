use long_snake_core::{Cell, GridBounds, OccupancyView};

/// Dense per-cell segment counts for the snake body.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    bounds: GridBounds,
    counts: Vec<u16>,
}

impl OccupancyGrid {
    pub(crate) fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            counts: vec![0; bounds.cell_count()],
        }
    }

    pub(crate) fn fill_with(&mut self, body: &[Cell]) {
        self.counts.fill(0);
        for cell in body {
            self.occupy(*cell);
        }
    }

    pub(crate) fn occupy(&mut self, cell: Cell) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = slot.saturating_add(1);
        }
    }

    pub(crate) fn vacate(&mut self, cell: Cell) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = slot.saturating_sub(1);
        }
    }

    pub(crate) fn is_free(&self, cell: Cell) -> bool {
        self.view().is_free(cell)
    }

    pub(crate) fn view(&self) -> OccupancyView<'_> {
        OccupancyView::new(&self.counts, self.bounds)
    }

    fn slot_mut(&mut self, cell: Cell) -> Option<&mut u16> {
        let index = self.bounds.index(cell)?;
        self.counts.get_mut(index)
    }
}
