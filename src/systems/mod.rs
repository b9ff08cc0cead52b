pub mod export;
pub mod grid;
pub mod interaction;
pub mod roof;
pub mod ui;
