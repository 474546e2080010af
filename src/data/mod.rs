pub mod export;
pub mod hotkeys;
pub mod mapper;
pub mod points;
pub mod regulation;
pub mod selection;
pub mod style;
