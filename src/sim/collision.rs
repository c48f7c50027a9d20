//! Collision detection between the bird and pipe gaps
//!
//! Pure axis-aligned overlap tests; no state is owned or mutated here.

use super::state::{Bird, Pipe};

/// True when the bird's box intersects either solid half of a pipe.
///
/// The bird collides when its horizontal extent overlaps the pipe's and it
/// pokes above the gap top or below the gap bottom.
pub fn bird_hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    let within_x = bird.x + bird.width > pipe.x && bird.x < pipe.x + pipe.width;
    if !within_x {
        return false;
    }

    bird.y < pipe.top_height || bird.bottom() > pipe.bottom_y
}
