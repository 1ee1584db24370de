pub mod helpers;
pub mod players;

pub use helpers::{horizontal_distance, point_in_box, point_in_box_xz, ray_hits_box, within_look_cone};
pub use players::{Axis, MoveVerdict, door_passable, integrate_vertical, move_verdict, resolve_axis_move, step_player};
