/// runnable demonstrations of the abstraction pipelines, selected by number from `main`
pub mod abstraction_examples;
