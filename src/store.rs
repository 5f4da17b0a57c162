use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::game::Players;

/// Where move logs live between sessions, one text line per log entry.
pub trait GameStore {
    /// The saved log of the pair's unfinished game, `None` when there is none.
    fn load_unfinished(&self, players: &Players) -> io::Result<Option<Vec<String>>>;
    fn save_unfinished(&mut self, players: &Players, lines: &[String]) -> io::Result<()>;
    fn discard_unfinished(&mut self, players: &Players) -> io::Result<()>;
    fn save_finished(&mut self, players: &Players, lines: &[String]) -> io::Result<()>;
}
/// Plain text files under a data directory:
/// `incomplete/<white>_<black>.txt` and
/// `complete/<white>_<black>_<unix seconds>.txt`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}
impl FileStore {
    pub const INCOMPLETE: &'static str = "incomplete";
    pub const COMPLETE: &'static str = "complete";

    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(Self::INCOMPLETE))?;
        fs::create_dir_all(root.join(Self::COMPLETE))?;
        debug!("data directory at {}", root.display());
        Ok(FileStore { root })
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    pub fn unfinished_path(&self, players: &Players) -> PathBuf {
        self.root
            .join(Self::INCOMPLETE)
            .join(format!("{}_{}.txt", players.white, players.black))
    }
    pub fn finished_path(&self, players: &Players, unix_secs: u64) -> PathBuf {
        self.root.join(Self::COMPLETE).join(format!(
            "{}_{}_{unix_secs}.txt",
            players.white, players.black,
        ))
    }
}
fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(path, text)?;
    info!("saved {} log lines to {}", lines.len(), path.display());
    Ok(())
}
impl GameStore for FileStore {
    fn load_unfinished(&self, players: &Players) -> io::Result<Option<Vec<String>>> {
        let path = self.unfinished_path(players);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(
                text.lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
    fn save_unfinished(&mut self, players: &Players, lines: &[String]) -> io::Result<()> {
        write_lines(&self.unfinished_path(players), lines)
    }
    fn discard_unfinished(&mut self, players: &Players) -> io::Result<()> {
        match fs::remove_file(self.unfinished_path(players)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
    fn save_finished(&mut self, players: &Players, lines: &[String]) -> io::Result<()> {
        let unix_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        write_lines(&self.finished_path(players, unix_secs), lines)
    }
}
/// Keeps everything in memory, for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    unfinished: FxHashMap<Players, Vec<String>>,
    finished: Vec<(Players, Vec<String>)>,
}
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
    pub fn finished(&self) -> &[(Players, Vec<String>)] {
        &self.finished
    }
}
impl GameStore for MemoryStore {
    fn load_unfinished(&self, players: &Players) -> io::Result<Option<Vec<String>>> {
        Ok(self.unfinished.get(players).cloned())
    }
    fn save_unfinished(&mut self, players: &Players, lines: &[String]) -> io::Result<()> {
        self.unfinished.insert(players.clone(), lines.to_vec());
        Ok(())
    }
    fn discard_unfinished(&mut self, players: &Players) -> io::Result<()> {
        self.unfinished.remove(players);
        Ok(())
    }
    fn save_finished(&mut self, players: &Players, lines: &[String]) -> io::Result<()> {
        self.finished.push((players.clone(), lines.to_vec()));
        Ok(())
    }
}
