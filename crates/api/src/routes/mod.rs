pub mod health;
pub mod pair_slots;
pub mod slots;
pub mod users;
