mod favorites;
mod notes;
mod novenas;
