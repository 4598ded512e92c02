use std::collections::HashMap;
use std::time::Instant;

use dashmap::DashMap;
use libris::config::DEFAULT_RECOMMENDATION_LIMIT;
use libris::logger::initialize_logger;
use libris::{Book, BookStore, ChainedHashMap, Config, Map, RecommendationSystem};
use log::info;
use rand::{distributions::Alphanumeric, Rng};

const NUM_BUCKETS: usize = 100;
const NUM_PAIRS: usize = 100_000;
const NUM_BOOKS: usize = 2_000;
const NUM_USERS: usize = 500;
const LOANS_PER_USER: usize = 8;

macro_rules! bench {
    ($name: expr, $body: expr) => {
        let now = Instant::now();
        $body;
        let elapsed = now.elapsed();
        println!("{} elapsed: {:.2?}", $name, elapsed);
    };
}

fn make_random_string() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}

fn make_random_string_pairs(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|_| (make_random_string(), make_random_string()))
        .collect()
}

fn fill<M>(map: &mut M, data: Vec<(String, String)>)
where
    M: Map<Key = String, Val = String>,
{
    for (key, val) in data {
        map.set(key, val);
    }
}

fn bench_maps(src: &[(String, String)]) {
    println!("bench maps, {} pairs", src.len());

    let map_data = src.to_vec();
    bench!("ChainedHashMap fixed", {
        let mut map = ChainedHashMap::with_buckets(NUM_BUCKETS);
        fill(&mut map, map_data);
    });

    let map_data = src.to_vec();
    bench!("ChainedHashMap growing", {
        let mut map = ChainedHashMap::with_growth(NUM_BUCKETS, 8);
        fill(&mut map, map_data);
    });

    let dmap_data = src.to_vec();
    bench!("DashMap", {
        let map = DashMap::new();
        for (key, val) in dmap_data {
            map.insert(key, val);
        }
    });

    let std_data = src.to_vec();
    bench!("std HashMap", {
        let mut map = HashMap::new();
        for (key, val) in std_data {
            map.insert(key, val);
        }
    });
}

fn make_catalog(config: Config) -> (BookStore, RecommendationSystem) {
    let mut rng = rand::thread_rng();
    let mut store = BookStore::with_config(config);
    let mut system = RecommendationSystem::with_config(config);

    for i in 0..NUM_BOOKS {
        let book = Book::new(
            format!("isbn-{i:06}"),
            make_random_string(),
            format!("author-{}", rng.gen_range(0, NUM_BOOKS / 10)),
            format!("category-{}", rng.gen_range(0, 40)),
            rng.gen_range(1, 5),
        );
        system.add_book_node(&book.node());
        store.add_book(book);
    }

    for u in 0..NUM_USERS {
        let user = format!("user-{u}");
        system.add_user_node(user.as_str());
        for _ in 0..LOANS_PER_USER {
            let isbn = format!("isbn-{:06}", rng.gen_range(0, NUM_BOOKS));
            if let Err(err) = system.add_relation(&user, &isbn) {
                log::warn!("{}", err);
            }
        }
    }
    (store, system)
}

fn bench_recommendations(config: Config, label: &str) {
    println!("bench recommendations ({label})");

    let (store, system) = make_catalog(config);
    info!(
        "{} books, {} graph nodes, {} edges",
        store.len(),
        system.graph().node_count(),
        system.graph().edge_count()
    );

    bench!(format!("{label} collaborative x{NUM_USERS}"), {
        for u in 0..NUM_USERS {
            system.user_book_recommendations(
                &format!("user-{u}"),
                DEFAULT_RECOMMENDATION_LIMIT,
            );
        }
    });

    bench!(format!("{label} content-based x{NUM_BOOKS}"), {
        for i in 0..NUM_BOOKS {
            system.content_based_recommendations(
                &format!("isbn-{i:06}"),
                DEFAULT_RECOMMENDATION_LIMIT,
            );
        }
    });
}

fn main() {
    initialize_logger();

    let input = make_random_string_pairs(NUM_PAIRS);
    bench_maps(&input);

    bench_recommendations(Config::default(), "fixed buckets");
    bench_recommendations(Config::default().with_growth(4), "growing buckets");
}
