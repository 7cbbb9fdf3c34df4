pub mod favorite;
pub mod note;
pub mod novena;

pub use favorite::{Favorite, FavoriteKind};
pub use note::{Note, NoteCategory, NoteInput};
pub use novena::NovenaProgress;
