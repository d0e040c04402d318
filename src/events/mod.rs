mod activity;
mod keyboard;

pub use activity::wire_activity;
pub use keyboard::wire_global_keydown;
