use std::path::Path;

/// The token stream visible to a command at the point it is dispatched.
///
/// A context is never mutated once built. Nested dispatch derives a new
/// context with a shorter argument list, leaving the parent untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    program_name: String,
    path: Vec<String>,
    arguments: Vec<String>,
    use_color: bool,
}

impl InvocationContext {
    pub fn new<I, S>(program_name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program_name: program_name.into(),
            path: Vec::new(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            use_color: false,
        }
    }

    /// Whether output written on behalf of this context may carry ANSI styling.
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Builds the top-level context from a full argv (program name first).
    ///
    /// The program name is reduced to its file name so that usage lines and
    /// completion scripts read `sak` rather than `/usr/local/bin/sak`.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let argv0 = args.next().unwrap_or_default();
        let program_name = Path::new(&argv0)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(argv0);
        Self::new(program_name, args)
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Selectors consumed on the way down to this context, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn selector(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Derives the context handed to the command named by the selector.
    pub fn descend(&self) -> Self {
        let mut path = self.path.clone();
        let mut arguments = self.arguments.iter().cloned();
        if let Some(selector) = arguments.next() {
            path.push(selector);
        }
        Self {
            program_name: self.program_name.clone(),
            path,
            arguments: arguments.collect(),
            use_color: self.use_color,
        }
    }

    /// Derives a context at the same depth with a replacement argument list.
    pub fn with_arguments<I, S>(&self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program_name: self.program_name.clone(),
            path: self.path.clone(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            use_color: self.use_color,
        }
    }

    /// The top of the tree: same program, no path, no arguments.
    pub fn root(&self) -> Self {
        Self {
            program_name: self.program_name.clone(),
            path: Vec::new(),
            arguments: Vec::new(),
            use_color: self.use_color,
        }
    }

    /// `program path...`, as shown in usage headers.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program_name.as_str())
            .chain(self.path.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
