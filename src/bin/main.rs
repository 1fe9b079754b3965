use crossterm::style::Stylize;
use decoder_core::config::Config;
use decoder_core::glossary::GlossaryTranslator;
use decoder_core::{apply_dict, persistence, serializer};
use decoder_core::{CorrectionDictionaryStore, DecodeSession, Decoder, ImportOutcome};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "decoder.json";
const DEFAULT_DICTIONARY: &str = "user";

struct App {
    config: Config,
    store: CorrectionDictionaryStore,
    session: DecodeSession,
    decoder: Decoder,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = match Config::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "[ERROR]".red());
            return;
        }
    };

    let mut store = CorrectionDictionaryStore::new(&config.storage_root)
        .with_default_replacements(config.replacements.clone());
    if let Err(e) = store.load(&config.identity) {
        eprintln!("{} {e}", "[ERROR]".red());
        return;
    }

    let mut app = App {
        session: DecodeSession::new("", &config.source_language, &config.target_language),
        decoder: Decoder::new(Arc::new(GlossaryTranslator::default())),
        config,
        store,
    };

    println!("{}", "Language Decoder. Type 'help' for commands, 'exit' to save and quit.".bold());
    loop {
        print!("\n> ");
        let _ = stdout().flush();

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim();
        if line == "exit" {
            break;
        }
        if let Err(message) = app.handle(line).await {
            println!("{} {message}", "[ERROR]".red());
        }
    }

    println!("\nSaving dictionaries...");
    match app.store.save(&app.config.identity) {
        Ok(()) => println!("Dictionaries saved for '{}'", app.config.identity),
        Err(e) => eprintln!("{} Could not save dictionaries: {e}", "[ERROR]".red()),
    }
}

impl App {
    async fn handle(&mut self, line: &str) -> Result<(), String> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" => print_help(),
            "open" => {
                let text = std::fs::read_to_string(rest).map_err(|e| e.to_string())?;
                self.session.set_source_text(text);
                self.prepare();
            }
            "text" => {
                self.session.set_source_text(rest);
                self.prepare();
            }
            "title" => self.session.set_title(rest),
            "lang" => {
                let (source, target) = rest.split_once(' ').ok_or("usage: lang <source> <target>")?;
                self.session.set_languages(source.trim(), target.trim());
            }
            "glossary" => {
                let glossary = GlossaryTranslator::from_file(Path::new(rest)).map_err(|e| e.to_string())?;
                println!("Loaded {} glossary entries", glossary.len());
                self.decoder = Decoder::new(Arc::new(glossary));
            }
            "decode" => {
                let status = self
                    .decoder
                    .run(&mut self.session, &self.store)
                    .await
                    .map_err(|e| e.to_string())?;
                println!("{status:?}");
                print_table(&self.session);
            }
            "show" => print_table(&self.session),
            "edit" => {
                let (index, word) = rest.split_once(' ').ok_or("usage: edit <index> <word>")?;
                let index: usize = index.parse().map_err(|_| "index must be a number")?;
                let word = word.trim();
                if !self.session.edit_target(index, word) {
                    return Err(format!("no word at index {index}"));
                }
                if let Some(source) = self.session.source_words().get(index).cloned() {
                    self.store.add_correction(DEFAULT_DICTIONARY, &source, word);
                }
            }
            "apply" => {
                let corrected = apply_dict(&mut self.session, &self.store);
                println!("{corrected} words corrected");
                print_table(&self.session);
            }
            "dicts" => {
                for name in self.store.dictionary_names() {
                    let size = self.store.dictionary(name).map_or(0, |d| d.len());
                    println!("  {} ({size} entries)", name.cyan());
                }
            }
            "dict" => self.handle_dict(rest)?,
            "export" => {
                let path = serializer::export_to_file(&self.session, Path::new(rest)).map_err(|e| e.to_string())?;
                println!("Session exported to '{}'", path.display());
            }
            "import" => {
                let outcome = serializer::import_file(&mut self.session, Path::new(rest)).map_err(|e| e.to_string())?;
                report(&outcome);
            }
            "snapshot" => {
                let (action, path) = rest.split_once(' ').ok_or("usage: snapshot save|load <file>")?;
                let path = Path::new(path.trim());
                match action {
                    "save" => persistence::save_snapshot(&self.session, path).map_err(|e| e.to_string())?,
                    "load" => self.session = persistence::load_snapshot(path).map_err(|e| e.to_string())?,
                    _ => return Err("usage: snapshot save|load <file>".to_string()),
                }
            }
            "save" => {
                self.store.save(&self.config.identity).map_err(|e| e.to_string())?;
                println!("Dictionaries saved");
            }
            other => return Err(format!("unknown command '{other}'")),
        }
        Ok(())
    }

    fn handle_dict(&mut self, rest: &str) -> Result<(), String> {
        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("import"), Some(name), Some(file)) => {
                let raw = std::fs::read_to_string(file).map_err(|e| e.to_string())?;
                let outcome = self.store.import_dictionary(name, &raw).map_err(|e| e.to_string())?;
                report(&outcome);
            }
            (Some("export"), Some(name), destination) => {
                let exported = self
                    .store
                    .export_dictionary(name, destination.map(Path::new))
                    .map_err(|e| e.to_string())?;
                match exported {
                    Some(json) => println!("{json}"),
                    None => println!("Dictionary '{name}' exported"),
                }
            }
            _ => return Err("usage: dict import <name> <file> | dict export <name> [dest]".to_string()),
        }
        Ok(())
    }

    fn prepare(&mut self) {
        decoder_core::decoder::prepare(&mut self.session, self.store.replacements());
        println!(
            "{} words, {} sentences",
            self.session.len(),
            self.session.sentences().len()
        );
    }
}

fn report(outcome: &ImportOutcome) {
    match outcome {
        ImportOutcome::Applied => println!("{}", "Imported".green()),
        ImportOutcome::Rejected(reason) => println!("{} {reason}", "Not applied:".yellow()),
    }
}

fn print_table(session: &DecodeSession) {
    let width = session.longest_word_len().min(20);
    println!("{}", session.display_title().bold());
    for (i, (source, target)) in session.pairs().enumerate() {
        println!("{i:>4}  {source:<width$}  {}", target.green());
    }
}

fn print_help() {
    println!("  open <file> | text <text>   set the source text");
    println!("  title <title>               set the title");
    println!("  lang <source> <target>      set the languages");
    println!("  glossary <file>             translate with a JSON glossary");
    println!("  decode                      split, decode and apply dictionaries");
    println!("  show                        print the aligned words");
    println!("  edit <index> <word>         correct a word and remember it");
    println!("  apply                       re-apply the dictionaries");
    println!("  dicts                       list dictionaries");
    println!("  dict import <name> <file>   import a dictionary");
    println!("  dict export <name> [dest]   export a dictionary");
    println!("  export <dest> | import <file>");
    println!("  snapshot save|load <file>");
    println!("  save | exit");
}
