mod common;
mod resolver;
mod rules;
