use reb2sac::Examples::abstraction_examples::abstraction_examples;
use simplelog::{Config, LevelFilter, SimpleLogger};

pub fn main() {
    let _ = SimpleLogger::init(LevelFilter::Info, Config::default());
    //
    let task: usize = 0;
    abstraction_examples(task);
}
