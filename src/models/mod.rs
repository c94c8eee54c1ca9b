pub mod assignment;
pub mod duty_type;
pub mod roster;
pub mod window;
