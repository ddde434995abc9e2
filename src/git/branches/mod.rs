mod operations;
mod tracking;
