//! `jbuild.xml` parsing.
//!
//! The document is a `<project>` root whose children use the same camelCase
//! names as the JSON format:
//!
//! ```xml
//! <project>
//!   <name>demo</name>
//!   <version>1.2.0</version>
//!   <modules>
//!     <module>core</module>
//!     <module>app</module>
//!   </modules>
//! </project>
//! ```
//!
//! `artifactId` is accepted as an alias of `name`. Unknown elements are ignored.

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};

use super::types::{ConfigError, ProjectConfig};

const ROOT: &str = "project";

/// Parse an XML project document into a `ProjectConfig`.
pub fn parse_project_xml(xml: &str, path: &Path) -> Result<ProjectConfig, ConfigError> {
  let mut reader = Reader::from_str(xml);
  reader.config_mut().trim_text(true);

  let mut parser = ProjectXmlParser::new(path);

  loop {
    match reader.read_event() {
      Ok(Event::Start(ref e)) => parser.handle_start(e)?,
      Ok(Event::Empty(ref e)) => {
        parser.handle_start(e)?;
        parser.handle_end();
      }
      Ok(Event::Text(ref e)) => parser.handle_text(e)?,
      Ok(Event::End(_)) => parser.handle_end(),
      Ok(Event::Eof) => break,
      Err(e) => {
        return Err(ConfigError::Xml {
          path: path.to_path_buf(),
          message: format!("at byte {}: {}", reader.error_position(), e),
        });
      }
      _ => {}
    }
  }

  parser.finish()
}

struct ProjectXmlParser {
  path: PathBuf,
  config: ProjectConfig,
  stack: Vec<String>,
  saw_root: bool,
}

impl ProjectXmlParser {
  fn new(path: &Path) -> Self {
    Self {
      path: path.to_path_buf(),
      config: ProjectConfig::file_base(),
      stack: Vec::new(),
      saw_root: false,
    }
  }

  fn error(&self, message: impl Into<String>) -> ConfigError {
    ConfigError::Xml {
      path: self.path.clone(),
      message: message.into(),
    }
  }

  fn handle_start(&mut self, e: &BytesStart<'_>) -> Result<(), ConfigError> {
    let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

    if self.stack.is_empty() {
      if tag != ROOT || self.saw_root {
        return Err(self.error(format!("expected a single <{}> root element, found <{}>", ROOT, tag)));
      }
      self.saw_root = true;
    } else if self.in_project_child() {
      // Entering a field: an element with no text means an empty value.
      if let Some(field) = self.string_field(&tag) {
        field.clear();
      }
    } else if self.at(&[ROOT, "modules"]) && tag == "module" {
      self.config.modules.push(String::new());
    }

    self.stack.push(tag);
    Ok(())
  }

  fn handle_text(&mut self, e: &BytesText<'_>) -> Result<(), ConfigError> {
    let text = e.unescape().map_err(|err| self.error(err.to_string()))?.to_string();

    if self.at(&[ROOT, "modules", "module"]) {
      if let Some(module) = self.config.modules.last_mut() {
        module.push_str(&text);
      }
      return Ok(());
    }

    if self.stack.len() != 2 || self.stack[0] != ROOT {
      return Ok(());
    }

    let tag = self.stack[1].clone();
    match tag.as_str() {
      "skipTests" => {
        let skip = text
          .parse::<bool>()
          .map_err(|_| self.error(format!("skipTests must be true or false, got `{}`", text)))?;
        self.config.skip_tests = skip;
      }
      "mainClass" => self.config.main_class = Some(text),
      "localRepository" => self.config.local_repository = Some(PathBuf::from(text)),
      _ => {
        if let Some(field) = self.string_field(&tag) {
          field.push_str(&text);
        }
      }
    }
    Ok(())
  }

  fn handle_end(&mut self) {
    self.stack.pop();
  }

  fn finish(self) -> Result<ProjectConfig, ConfigError> {
    if !self.saw_root {
      return Err(self.error(format!("missing <{}> root element", ROOT)));
    }
    Ok(self.config)
  }

  fn in_project_child(&self) -> bool {
    self.at(&[ROOT])
  }

  fn at(&self, path: &[&str]) -> bool {
    self.stack.len() == path.len() && self.stack.iter().zip(path).all(|(a, b)| a == b)
  }

  fn string_field(&mut self, tag: &str) -> Option<&mut String> {
    let config = &mut self.config;
    match tag {
      "name" | "artifactId" => Some(&mut config.name),
      "version" => Some(&mut config.version),
      "groupId" => Some(&mut config.group_id),
      "sourceDirectory" => Some(&mut config.source_directory),
      "testSourceDirectory" => Some(&mut config.test_source_directory),
      "resourceDirectory" => Some(&mut config.resource_directory),
      "outputDirectory" => Some(&mut config.output_directory),
      "testOutputDirectory" => Some(&mut config.test_output_directory),
      "exampleMainClass" => Some(&mut config.example_main_class),
      _ => None,
    }
  }
}
