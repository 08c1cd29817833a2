use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "brisk", "calm", "clever", "dapper", "eager", "gentle", "keen",
    "lively", "mellow", "nimble", "quiet", "rustic", "spry", "vivid", "witty",
];

const ANIMALS: &[&str] = &[
    "badger", "crane", "dingo", "falcon", "heron", "ibex", "lynx", "marmot",
    "otter", "panda", "quail", "raven", "stoat", "tapir", "vole", "wren",
];

/// One human-readable nickname candidate. Uniqueness is the caller's problem.
pub fn generate_nickname() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}_{}_{}",
        ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
        ANIMALS[rng.gen_range(0..ANIMALS.len())],
        rng.gen_range(0..1000)
    )
}
