mod operations;
mod sync;
