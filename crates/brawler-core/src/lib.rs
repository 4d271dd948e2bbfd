pub mod commands;
pub mod events;
pub mod roster;
pub mod view;
