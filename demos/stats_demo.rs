use clap::Parser;
use linear_probe::Config;
use linear_probe::DefaultHashBuilder;
use linear_probe::HashMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    #[arg(short = 'c', long = "initial_capacity", default_value_t = linear_probe::config::DEFAULT_INITIAL_CAPACITY)]
    initial_capacity: usize,

    #[arg(short = 'g', long = "growth_factor", default_value_t = linear_probe::config::DEFAULT_GROWTH_FACTOR)]
    growth_factor: usize,

    #[arg(short = 'l', long = "load-factor", default_value_t = linear_probe::config::DEFAULT_LOAD_FACTOR)]
    load_factor: f64,

    /// Print every slot after filling the table.
    #[arg(long)]
    full: bool,
}

fn main() {
    let args = Args::parse();

    let config = Config::default()
        .with_initial_capacity(args.initial_capacity)
        .with_growth_factor(args.growth_factor)
        .with_load_factor(args.load_factor);

    let mut map: HashMap<u64, u64, DefaultHashBuilder> = match HashMap::try_with_config(config) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    println!("Filling table with {} u64 keys: {:?}", args.count, config);
    for key in 0..args.count {
        if let Err(err) = map.insert(key, key.wrapping_mul(key)) {
            eprintln!("insert of {key} failed: {err}");
            std::process::exit(1);
        }
    }

    let mut misses = 0;
    for key in args.count..args.count * 2 {
        if !map.contains_key(&key) {
            misses += 1;
        }
    }

    println!("Inserted {} keys, {} absent keys confirmed missing", map.len(), misses);
    map.stats().print();
    map.dump(args.full);
}
