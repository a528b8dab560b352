//! Line-oriented interactive front end.
//!
//! Reads queries, enumerates solutions one at a time, and handles the
//! colon-prefixed special commands. Generic over its input and output
//! streams so it can be driven from tests.

use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use log::debug;

use crate::frame::Frame;
use crate::graph;
use crate::knowledge::{Knowledge, KnowledgeError, Rule};
use crate::parser;
use crate::search::SearchTree;
use crate::term::Structure;

const HELP: &str = "\
Input a query in the form of a structure term (for example descend(tom, Who)).
The query is evaluated against the knowledge base and solutions for its free
variables are listed one by one.
Special commands are prefixed by a colon:
\t:quit\t\t\tStop the REPL.
\t:help\t\t\tPrint this help.
\t:consult FILE\t\tLoad rules and facts from FILE.
\t:knowledge\t\tPrint all known rules and facts.
\t:savetree [FILE]\tRender the search tree of the last query to a PNG
\t\t\t\timage named FILE (default: searchtree.png).
";

/// The interactive read-eval-print loop.
#[derive(Debug)]
pub struct Repl<R, W> {
    input: R,
    output: W,
    rules: Vec<Rule>,
    knowledge: Knowledge,
    last_tree_dot: Option<String>,
    quit: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// A REPL over an initial rule list.
    ///
    /// # Errors
    ///
    /// Fails when the rules do not form a valid knowledge base.
    pub fn new(rules: Vec<Rule>, input: R, output: W) -> Result<Self, KnowledgeError> {
        let knowledge = Knowledge::new(rules.clone())?;
        Ok(Self {
            input,
            output,
            rules,
            knowledge,
            last_tree_dot: None,
            quit: false,
        })
    }

    /// Run until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors of the underlying streams.
    pub fn run(&mut self) -> io::Result<()> {
        while !self.quit {
            write!(self.output, "?- ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix(':') {
                self.handle_command(command)?;
                continue;
            }

            match parser::parse_query("repl", line) {
                Ok(query) => self.evaluate(&query)?,
                Err(error) => writeln!(self.output, "Syntax error: {error}.\n")?,
            }
        }
        Ok(())
    }

    /// Enumerate solutions, pausing for confirmation between them.
    fn evaluate(&mut self, query: &Structure) -> io::Result<()> {
        let mut tree = SearchTree::new(&self.knowledge, query);

        let mut write_all = false;
        loop {
            let frame = tree.search_one();
            write_solution(&mut self.output, frame.as_ref())?;
            if frame.is_none() {
                break;
            }
            if write_all {
                continue;
            }

            write!(self.output, "More? [y]/n/all: ")?;
            self.output.flush()?;
            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                break;
            }
            writeln!(self.output)?;

            match answer.trim() {
                "all" => write_all = true,
                "" | "y" | "Y" | "yes" | ";" => {}
                _ => break,
            }
        }
        writeln!(self.output)?;

        self.last_tree_dot = Some(graph::to_dot(&tree));
        Ok(())
    }

    fn handle_command(&mut self, command: &str) -> io::Result<()> {
        let mut parts = command.split_whitespace();
        match parts.next() {
            None => writeln!(self.output, "No command name supplied.")?,
            Some("quit") => self.quit = true,
            Some("help") => write!(self.output, "{HELP}")?,
            Some("knowledge") => write!(self.output, "{}", self.knowledge)?,
            Some("consult") => match parts.next() {
                Some(path) => self.consult(path)?,
                None => writeln!(self.output, ":consult needs a file name.")?,
            },
            Some("savetree") => {
                let file = parts.next().unwrap_or("searchtree.png");
                self.save_tree(file)?;
            }
            Some(_) => writeln!(self.output, "Unknown command: {command}")?,
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Load a file's rules and rebuild the knowledge base from the
    /// accumulated rule list.
    fn consult(&mut self, path: &str) -> io::Result<()> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                writeln!(self.output, "Cannot read {path}: {error}")?;
                return Ok(());
            }
        };
        match parser::parse_rules(path, &source) {
            Ok(rules) => {
                let mut combined = self.rules.clone();
                combined.extend(rules);
                match Knowledge::new(combined.clone()) {
                    Ok(knowledge) => {
                        debug!("consulted {path}: {} predicates", knowledge.len());
                        self.rules = combined;
                        self.knowledge = knowledge;
                        writeln!(self.output, "Consulted {path}.")?;
                    }
                    Err(error) => writeln!(self.output, "Cannot load {path}: {error}")?,
                }
            }
            Err(error) => writeln!(self.output, "Syntax error: {error}.")?,
        }
        Ok(())
    }

    /// Render the last query's search tree through the external `dot`
    /// tool. A failure is reported and leaves everything else intact.
    fn save_tree(&mut self, file: &str) -> io::Result<()> {
        let Some(dot) = &self.last_tree_dot else {
            writeln!(self.output, "No query was issued yet.")?;
            return Ok(());
        };
        match render_png(dot, file) {
            Ok(()) => writeln!(self.output, "Saved tree to {file}.")?,
            Err(error) => writeln!(self.output, "Cannot render tree: {error}")?,
        }
        Ok(())
    }
}

fn write_solution<W: Write>(output: &mut W, frame: Option<&Frame>) -> io::Result<()> {
    match frame {
        None => writeln!(output, "No."),
        Some(frame) if frame.is_empty() => writeln!(output, "Yes."),
        Some(frame) => {
            for (variable, term) in frame.iter() {
                writeln!(output, "{variable} = {term}")?;
            }
            Ok(())
        }
    }
}

fn render_png(dot: &str, file: &str) -> io::Result<()> {
    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(file)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("dot exited with {status}"),
        ));
    }
    Ok(())
}
