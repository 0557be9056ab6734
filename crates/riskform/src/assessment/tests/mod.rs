mod common;
mod compile;
mod rules;
