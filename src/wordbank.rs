use crate::error::GameError;
use crate::evaluator::WORD_LENGTH;
use crate::info_log;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_uppercase();
    (word.chars().count() == WORD_LENGTH).then_some(word)
}

/// Parse a newline-delimited word list, keeping file order.
///
/// Lines are trimmed and uppercased; anything that is not exactly five
/// characters long is dropped without complaint.
pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    data.lines().filter_map(normalize).collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, GameError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| GameError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(load_wordbank_from_str(&data))
}

/// The set of words accepted as guesses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    pub fn load(raw: &str) -> Self {
        load_wordbank_from_str(raw).into_iter().collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<String> for Dictionary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

/// Dictionary plus the pool secrets are drawn from.
#[derive(Debug, Clone)]
pub struct WordStore {
    dictionary: Dictionary,
    pool: Vec<String>,
    rng: StdRng,
}

impl WordStore {
    /// Build a store whose secret pool is the whole word list.
    pub fn new(words: Vec<String>) -> Self {
        let pool = dedup_in_order(words);
        Self {
            dictionary: pool.iter().cloned().collect(),
            pool,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Restrict secrets to `pool`. Pool words become valid guesses too.
    #[must_use]
    pub fn with_pool(mut self, pool: Vec<String>) -> Self {
        let pool = dedup_in_order(pool);
        self.dictionary.words.extend(pool.iter().cloned());
        self.pool = pool;
        self
    }

    /// Replace the OS-seeded generator with a deterministic one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Draw a secret uniformly from the pool.
    pub fn pick_secret(&mut self) -> Result<String, GameError> {
        let secret = self
            .pool
            .choose(&mut self.rng)
            .cloned()
            .ok_or(GameError::EmptyPool)?;
        info_log!("pick_secret() - drew a secret from {} words", self.pool.len());
        Ok(secret)
    }
}

fn dedup_in_order(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Where the word lists come from.
#[derive(Debug, Clone, Default)]
pub struct WordSource {
    /// Newline-delimited dictionary; the embedded list when absent
    pub dictionary: Option<PathBuf>,
    /// Optional separate pool of secrets
    pub answers: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl WordSource {
    pub fn load(&self) -> Result<WordStore, GameError> {
        let words = match &self.dictionary {
            Some(path) => load_wordbank_from_file(path)?,
            None => load_wordbank_from_str(EMBEDDED_WORDBANK),
        };
        let mut store = WordStore::new(words);
        if let Some(path) = &self.answers {
            store = store.with_pool(load_wordbank_from_file(path)?);
        }
        if let Some(seed) = self.seed {
            store = store.with_seed(seed);
        }
        info_log!(
            "WordSource::load() - {} dictionary words, {} candidate secrets",
            store.dictionary().len(),
            store.pool().len()
        );
        Ok(store)
    }
}

/// One-shot background load of a [`WordSource`].
pub struct WordLoader {
    receiver: Receiver<Result<WordStore, GameError>>,
}

impl WordLoader {
    pub fn spawn(source: WordSource) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may already be gone if the user quit while loading.
            let _ = sender.send(source.load());
        });
        Self { receiver }
    }

    /// Non-blocking check; `None` while the load is still running.
    pub fn try_finish(&self) -> Option<Result<WordStore, GameError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GameError::LoaderStopped)),
        }
    }

    pub fn wait(self) -> Result<WordStore, GameError> {
        self.receiver
            .recv()
            .unwrap_or(Err(GameError::LoaderStopped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_load_wordbank_filters_and_normalizes() {
        let data = "crane\n  Slate \nTOOLONG\nab\n\nraise\r\n";
        assert_eq!(load_wordbank_from_str(data), words(&["CRANE", "SLATE", "RAISE"]));
    }

    #[test]
    fn test_load_wordbank_counts_characters_not_bytes() {
        let data = "pão\nmaçãs\ncanção\n";
        assert_eq!(load_wordbank_from_str(data), words(&["MAÇÃS"]));
    }

    #[test]
    fn test_load_wordbank_empty_input() {
        assert!(load_wordbank_from_str("").is_empty());
        assert!(Dictionary::load("x\nyy\n").is_empty());
    }

    #[test]
    fn test_embedded_wordbank_is_usable() {
        let bank = load_wordbank_from_str(EMBEDDED_WORDBANK);
        assert!(bank.len() > 100);
        assert!(bank.iter().all(|w| w.chars().count() == WORD_LENGTH));
    }

    #[test]
    fn test_dictionary_contains_uppercase_only() {
        let dictionary = Dictionary::load("crane\nslate\n");
        assert!(dictionary.contains("CRANE"));
        assert!(!dictionary.contains("crane"));
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn test_pick_secret_from_pool() {
        let mut store = WordStore::new(words(&["CRANE", "SLATE", "RAISE"]));
        for _ in 0..20 {
            let secret = store.pick_secret().unwrap();
            assert!(store.pool().contains(&secret));
        }
    }

    #[test]
    fn test_pick_secret_empty_pool_fails() {
        let mut store = WordStore::new(Vec::new());
        assert!(matches!(store.pick_secret(), Err(GameError::EmptyPool)));
    }

    #[test]
    fn test_pick_secret_seeded_is_reproducible() {
        let list = words(&["CRANE", "SLATE", "RAISE", "STARE", "ARISE", "IRATE"]);
        let mut a = WordStore::new(list.clone()).with_seed(7);
        let mut b = WordStore::new(list).with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.pick_secret().unwrap(), b.pick_secret().unwrap());
        }
    }

    #[test]
    fn test_pick_secret_rerandomizes_each_call() {
        let list: Vec<String> = load_wordbank_from_str(EMBEDDED_WORDBANK);
        let mut store = WordStore::new(list).with_seed(42);
        let draws: HashSet<String> = (0..30).map(|_| store.pick_secret().unwrap()).collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn test_with_pool_restricts_secrets_and_extends_dictionary() {
        let mut store = WordStore::new(words(&["CRANE", "SLATE"])).with_pool(words(&["PIZZA"]));
        assert!(store.dictionary().contains("PIZZA"));
        assert!(store.dictionary().contains("CRANE"));
        assert_eq!(store.pick_secret().unwrap(), "PIZZA");
    }

    #[test]
    fn test_duplicate_words_collapse() {
        let store = WordStore::new(words(&["CRANE", "CRANE", "SLATE"]));
        assert_eq!(store.pool(), words(&["CRANE", "SLATE"]).as_slice());
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let result = load_wordbank_from_file("/definitely/not/here/words.txt");
        assert!(matches!(result, Err(GameError::Load { .. })));
    }

    #[test]
    fn test_word_source_from_files() {
        let dir = std::env::temp_dir();
        let dict_path = dir.join("termo_test_source_dictionary.txt");
        let answers_path = dir.join("termo_test_source_answers.txt");
        {
            let mut file = fs::File::create(&dict_path).unwrap();
            writeln!(file, "apple\ngrape\nlemon").unwrap();
            let mut file = fs::File::create(&answers_path).unwrap();
            writeln!(file, "melon").unwrap();
        }

        let source = WordSource {
            dictionary: Some(dict_path.clone()),
            answers: Some(answers_path.clone()),
            seed: Some(1),
        };
        let mut store = source.load().unwrap();
        assert_eq!(store.dictionary().len(), 4);
        assert_eq!(store.pick_secret().unwrap(), "MELON");

        fs::remove_file(&dict_path).unwrap();
        fs::remove_file(&answers_path).unwrap();
    }

    #[test]
    fn test_word_loader_delivers_embedded_list() {
        let loader = WordLoader::spawn(WordSource::default());
        let store = loader.wait().unwrap();
        assert!(!store.pool().is_empty());
    }

    #[test]
    fn test_word_loader_reports_load_error() {
        let loader = WordLoader::spawn(WordSource {
            dictionary: Some(PathBuf::from("/definitely/not/here/words.txt")),
            ..WordSource::default()
        });
        assert!(matches!(loader.wait(), Err(GameError::Load { .. })));
    }
}
