use super::AttributeType;

/// How definitions that already exist in the substrate are treated.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum RegistrationMode {
    /// Existing definitions are replaced.
    #[default]
    UpdateIfExists,
    /// Existing definitions are kept, so consecutive runs do not redefine them.
    DontUpdateIfExists,
}

/// Definition of a monitored parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub name: String,
    pub description: String,
    pub raw_type: AttributeType,
}

/// Definition of one argument of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub raw_type: AttributeType,
    pub optional: bool,
}

impl ArgumentDefinition {
    pub fn required(name: &str, raw_type: AttributeType) -> Self {
        Self { name: name.to_string(), raw_type, optional: false }
    }

    pub fn optional(name: &str, raw_type: AttributeType) -> Self {
        Self { name: name.to_string(), raw_type, optional: true }
    }
}

/// Definition of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<ArgumentDefinition>,
}

/// Outbound registration interface of the control substrate.
pub trait Registration {
    fn set_mode(&mut self, mode: RegistrationMode);
    fn register_parameters(&mut self, definitions: Vec<ParameterDefinition>);
    fn register_actions(&mut self, definitions: Vec<ActionDefinition>);
}

/// In-process registration table, announced to every client of the control endpoint.
#[derive(Debug, Default)]
pub struct RegistrationTable {
    mode: RegistrationMode,
    parameters: Vec<ParameterDefinition>,
    actions: Vec<ActionDefinition>,
}

impl RegistrationTable {
    pub fn new() -> Self { Self::default() }

    pub fn mode(&self) -> RegistrationMode { self.mode }
    pub fn parameters(&self) -> &[ParameterDefinition] { &self.parameters }
    pub fn actions(&self) -> &[ActionDefinition] { &self.actions }

    pub fn parameter_names(&self) -> Vec<String> { self.parameters.iter().map(|p| p.name.clone()).collect() }
    pub fn action_names(&self) -> Vec<String> { self.actions.iter().map(|a| a.name.clone()).collect() }

    fn upsert<T, F>(mode: RegistrationMode, existing: &mut Vec<T>, new: Vec<T>, name: F)
    where F: Fn(&T) -> &str {
        for def in new {
            match existing.iter().position(|e| name(e) == name(&def)) {
                Some(_) if mode == RegistrationMode::DontUpdateIfExists => {}
                Some(i) => existing[i] = def,
                None => existing.push(def),
            }
        }
    }
}

impl Registration for RegistrationTable {
    fn set_mode(&mut self, mode: RegistrationMode) { self.mode = mode; }

    fn register_parameters(&mut self, definitions: Vec<ParameterDefinition>) {
        Self::upsert(self.mode, &mut self.parameters, definitions, |p| p.name.as_str());
    }

    fn register_actions(&mut self, definitions: Vec<ActionDefinition>) {
        Self::upsert(self.mode, &mut self.actions, definitions, |a| a.name.as_str());
    }
}
