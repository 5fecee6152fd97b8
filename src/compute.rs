//! Rasterization, collision detection and per-chain frame updates.
//!
//! Collisions are found by reading the surface back before drawing: a cell
//! that already holds a non-blank glyph means something was drawn there
//! earlier this frame.  Which chain is advanced first therefore decides who
//! collides with whom.

use log::{debug, trace};

use crate::chain::Chain;
use crate::display::Surface;
use crate::entities::Entity;

// ── Rasterizer ────────────────────────────────────────────────────────────────

/// Draw `entity` onto `surface`.  Returns `true` if any of its cells landed
/// on existing content, in which case the entity now carries its explosion
/// bitmap and a fresh explosion countdown.
///
/// All cells are checked before any is written, so the drawn image is
/// always one whole bitmap, never a mix of body and explosion.
pub fn place<S: Surface + ?Sized>(entity: &mut Entity, surface: &mut S) -> bool {
    let collided = entity
        .cells()
        .any(|(row, col, _)| surface.read_cell(row, col).is_occupied());

    if collided {
        debug!("collision at ({}, {})", entity.row, entity.col);
        entity.explode();
    }

    for (row, col, glyph) in entity.cells() {
        surface.write_cell(row, col, glyph);
    }
    collided
}

// ── Frame updater ─────────────────────────────────────────────────────────────

/// Advance every node in `chain` by one tick: reap the ones whose lifetime
/// runs out, move and draw the rest.  Each node is visited exactly once.
pub fn advance<S: Surface + ?Sized>(chain: &mut Chain, surface: &mut S) {
    let mut cursor = chain.first();

    while let Some(node) = cursor {
        cursor = node.borrow().next();

        let expired = node.borrow_mut().entity_mut().lifetime.tick();
        if expired {
            {
                let n = node.borrow();
                trace!("reaping entity at ({}, {})", n.entity().row, n.entity().col);
            }
            chain.unlink(node);
            continue;
        }

        let mut n = node.borrow_mut();
        let entity = n.entity_mut();
        entity.step();
        place(entity, surface);
    }
}
