//! Shelf rectangle packer
//!
//! Packs rectangles into a fixed-width region whose height grows as shelves
//! are opened. Rectangles are placed tallest-first so shelves stay tight; the
//! caller's order is preserved in the output slice.

/// A rectangle to pack; `x`/`y` are filled in by [`RectPacker::pack`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackRect {
    pub w: u32,
    pub h: u32,
    pub x: u32,
    pub y: u32,
    pub was_packed: bool,
}

impl PackRect {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            ..Default::default()
        }
    }

    /// Bottom edge after packing
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
}

/// A shelf in the packing region
#[derive(Debug)]
struct Shelf {
    /// Y position of this shelf
    y: u32,
    /// Height of this shelf
    height: u32,
    /// Current X position (next free space)
    x: u32,
}

/// Fixed-width shelf packer
#[derive(Debug)]
pub struct RectPacker {
    width: u32,
    max_height: u32,
    shelves: Vec<Shelf>,
}

impl RectPacker {
    pub fn new(width: u32, max_height: u32) -> Self {
        Self {
            width,
            max_height,
            shelves: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height consumed by all shelves opened so far
    pub fn used_height(&self) -> u32 {
        self.shelves.last().map(|s| s.y + s.height).unwrap_or(0)
    }

    /// Allocate space for one rectangle
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width {
            return None;
        }

        // Find the shelf that wastes the least height
        let mut best_shelf = None;
        let mut best_waste = u32::MAX;

        for (i, shelf) in self.shelves.iter().enumerate() {
            if shelf.height >= height && shelf.x + width <= self.width {
                let waste = shelf.height - height;
                if waste < best_waste {
                    best_waste = waste;
                    best_shelf = Some(i);
                }
            }
        }

        if let Some(shelf_idx) = best_shelf {
            let shelf = &mut self.shelves[shelf_idx];
            let pos = (shelf.x, shelf.y);
            shelf.x += width;
            return Some(pos);
        }

        // Open a new shelf
        let new_y = self.used_height();
        if new_y + height > self.max_height {
            return None;
        }
        self.shelves.push(Shelf {
            y: new_y,
            height,
            x: width,
        });
        Some((0, new_y))
    }

    /// Pack every rectangle, returning `false` if any did not fit
    pub fn pack(&mut self, rects: &mut [PackRect]) -> bool {
        let mut order: Vec<usize> = (0..rects.len()).collect();
        order.sort_by(|&a, &b| rects[b].h.cmp(&rects[a].h).then(rects[b].w.cmp(&rects[a].w)));

        let mut all_packed = true;
        for i in order {
            let rect = &mut rects[i];
            if rect.w == 0 || rect.h == 0 {
                rect.x = 0;
                rect.y = 0;
                rect.was_packed = true;
                continue;
            }
            match self.allocate(rect.w, rect.h) {
                Some((x, y)) => {
                    rect.x = x;
                    rect.y = y;
                    rect.was_packed = true;
                }
                None => {
                    rect.was_packed = false;
                    all_packed = false;
                }
            }
        }
        all_packed
    }
}
