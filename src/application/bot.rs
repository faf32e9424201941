//! The host bot - Owns the extension table, commands and listeners

use std::sync::Arc;

use crate::application::errors::{CommandError, DiscoveryError, ExtensionError, ImportError};
use crate::application::extensions::{Extension, ExtensionCatalog, ExtensionLoader, Ignore};
use crate::application::messaging::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Command, Event, EventKind, Listener};
use crate::domain::traits::{ExtensionHost, ModuleFinder};
use crate::infrastructure::http::HttpClient;

/// A bot that discovers and loads its extensions from a package tree
pub struct TutorialBot {
    finder: Arc<dyn ModuleFinder>,
    catalog: ExtensionCatalog,
    parser: MessageParser,
    commands: CommandService,
    listeners: Vec<(EventKind, Listener)>,
    extensions: Vec<(String, Arc<dyn Extension>)>,
    http: Option<HttpClient>,
    // Every unit whose setup ran, failed ones included. Declared last so
    // native libraries unload only after the handlers they registered.
    units: Vec<Arc<dyn Extension>>,
}

impl TutorialBot {
    pub fn new<I, S>(finder: Arc<dyn ModuleFinder>, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            finder,
            catalog: ExtensionCatalog::new(),
            parser: MessageParser::new(prefixes),
            commands: CommandService::new(),
            listeners: Vec::new(),
            extensions: Vec::new(),
            http: None,
            units: Vec::new(),
        }
    }

    /// Built-in units that manifests may name in `setup`
    pub fn with_catalog(mut self, catalog: ExtensionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    pub fn http(&self) -> Option<&HttpClient> {
        self.http.as_ref()
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    pub fn add_command(&mut self, command: Command) {
        tracing::debug!("Registering {} command {}", command.kind, command.name);
        self.commands.register(command);
    }

    pub fn add_listener<F>(&mut self, kind: EventKind, listener: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.listeners.push((kind, Arc::new(listener)));
    }

    /// Loaded extension names, in load order
    pub fn extensions(&self) -> Vec<&str> {
        self.extensions.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.extensions.iter().any(|(n, _)| n == name)
    }

    /// Names of every extension below `root`, without loading them
    pub fn find_extensions(
        &self,
        root: &str,
        package: Option<&str>,
        ignore: Option<&Ignore>,
    ) -> Result<Vec<String>, DiscoveryError> {
        ExtensionLoader::new(self.finder.as_ref()).find_extensions(root, package, ignore)
    }

    /// Load every extension below `root`, skipping the ones that fail
    pub fn load_extensions(
        &mut self,
        root: &str,
        package: Option<&str>,
        ignore: Option<&Ignore>,
        on_loaded: Option<&mut dyn FnMut(&str)>,
    ) -> Result<(), DiscoveryError> {
        let finder = Arc::clone(&self.finder);
        ExtensionLoader::new(finder.as_ref()).load_extensions(self, root, package, ignore, on_loaded)
    }

    /// Deliver an event to listeners, then run the command it invokes
    pub fn dispatch(&self, event: &Event) -> Result<Option<String>, CommandError> {
        let kind = event.kind();
        for (_, listener) in self.listeners.iter().filter(|(k, _)| *k == kind) {
            listener(event);
        }

        match event {
            Event::Ready(_) => Ok(None),
            Event::Message(message) => self.commands.handle(message),
        }
    }
}

impl ExtensionHost for TutorialBot {
    fn load_extension(&mut self, name: &str) -> Result<(), ExtensionError> {
        if self.is_loaded(name) {
            return Err(ExtensionError::AlreadyLoaded(name.to_string()));
        }

        let module = self.finder.import(name).map_err(|e| match e {
            ImportError::NotFound(_) => ExtensionError::NotFound(name.to_string()),
            other => ExtensionError::failed(name, other),
        })?;

        let entry = module
            .entry_point
            .ok_or_else(|| ExtensionError::NoEntryPoint(name.to_string()))?;

        let extension = self.catalog.resolve(name, &entry)?;
        self.units.push(Arc::clone(&extension));

        // Partial registrations made before a failure stay in place
        extension
            .setup(self)
            .map_err(|e| ExtensionError::failed(name, e))?;

        tracing::info!("Loaded extension {} ({})", name, extension.name());
        self.extensions.push((name.to_string(), extension));
        Ok(())
    }
}
