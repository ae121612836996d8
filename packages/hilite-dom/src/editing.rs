//! Native editing commands (the `document.execCommand` family).
//!
//! Only the background colour command is implemented. Hosts declare through
//! [`EditingCapabilities`] whether it exists at all and whether its effects land in
//! the tree immediately or only once pending commands are flushed.

use bitflags::bitflags;
use color::Rgba8;

use crate::range::{BoundaryPoint, DomRange};
use crate::style::{parse_css_color, serialize_rgb};
use crate::util::attr_name;
use crate::{Attribute, BaseDocument, qual_name};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EditingCapabilities: u8 {
        /// The background colour command is available
        const HILITE_COLOR = 0b0000_0001;
        /// Command results only materialize when pending commands are flushed
        const DEFERRED_PAINT = 0b0000_0010;
    }
}

impl Default for EditingCapabilities {
    fn default() -> Self {
        EditingCapabilities::HILITE_COLOR
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecCommand {
    /// Paint the background of the selected text. The value is any CSS colour.
    HiliteColor(String),
}

impl ExecCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ExecCommand::HiliteColor(_) => "hiliteColor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran and created these elements (in document order)
    Applied { created: Vec<usize> },
    /// The command was accepted and will be painted on the next flush
    Deferred { ticket: CommandTicket },
    /// The host does not support the command. Nothing was changed.
    Unsupported,
    /// The selection is missing or collapsed. Nothing was changed.
    NothingSelected,
    /// The command value could not be parsed. Nothing was changed.
    InvalidValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandSupport {
    Immediate,
    Deferred,
    Unsupported,
}

/// Identifies a deferred command from the moment it is queued until it is flushed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandTicket(pub u64);

/// A command accepted by a `DEFERRED_PAINT` host but not yet painted.
///
/// The range is live: splitting and merging text nodes moves its boundary points
/// along with the text, like the live selection.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCommand {
    pub ticket: CommandTicket,
    pub range: DomRange,
    pub color: Rgba8,
}

/// What became of one deferred command when pending commands were flushed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlushedCommand {
    /// The command ran and created these elements (in document order)
    Painted { ticket: CommandTicket, created: Vec<usize> },
    /// The command's range no longer points into the tree. Nothing was changed.
    Dropped { ticket: CommandTicket },
}

impl FlushedCommand {
    pub fn ticket(&self) -> CommandTicket {
        match self {
            FlushedCommand::Painted { ticket, .. } | FlushedCommand::Dropped { ticket } => *ticket,
        }
    }
}

impl BaseDocument {
    pub fn query_command_supported(&self, command: &ExecCommand) -> CommandSupport {
        match command {
            ExecCommand::HiliteColor(_) => {
                if !self.capabilities.contains(EditingCapabilities::HILITE_COLOR) {
                    CommandSupport::Unsupported
                } else if self.capabilities.contains(EditingCapabilities::DEFERRED_PAINT) {
                    CommandSupport::Deferred
                } else {
                    CommandSupport::Immediate
                }
            }
        }
    }

    /// Run a native editing command against the live selection
    pub fn exec_command(&mut self, command: ExecCommand) -> CommandOutcome {
        let support = self.query_command_supported(&command);
        if support == CommandSupport::Unsupported {
            return CommandOutcome::Unsupported;
        }

        let ExecCommand::HiliteColor(value) = command;
        let Some(color) = parse_css_color(&value) else {
            return CommandOutcome::InvalidValue;
        };

        let Some(range) = self.selection_range().filter(|range| !range.is_collapsed()) else {
            return CommandOutcome::NothingSelected;
        };

        if support == CommandSupport::Deferred {
            self.next_command_ticket += 1;
            let ticket = CommandTicket(self.next_command_ticket);
            self.pending_commands.push(PendingCommand { ticket, range, color });
            return CommandOutcome::Deferred { ticket };
        }

        CommandOutcome::Applied {
            created: self.paint_background(range, color),
        }
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.pending_commands.is_empty()
    }

    /// Paint the queued commands in the order they were issued, reporting on each one
    pub fn flush_pending_commands(&mut self) -> Vec<FlushedCommand> {
        let mut flushed = Vec::with_capacity(self.pending_commands.len());
        // Painting splits text nodes, which moves the ranges of the commands still queued
        while !self.pending_commands.is_empty() {
            let PendingCommand { ticket, range, color } = self.pending_commands.remove(0);
            let is_live = |point: BoundaryPoint| {
                self.is_connected(point.node) && self.is_valid_boundary_point(point)
            };
            if !is_live(range.start) || !is_live(range.end) {
                #[cfg(feature = "tracing")]
                tracing::warn!("Dropping pending command {ticket:?} with a stale range {range:?}");
                flushed.push(FlushedCommand::Dropped { ticket });
                continue;
            }
            let created = self.paint_background(range, color);
            flushed.push(FlushedCommand::Painted { ticket, created });
        }
        flushed
    }

    /// Boundary points of every queued command, for keeping them live across mutations
    pub(crate) fn pending_command_points_mut(&mut self) -> impl Iterator<Item = &mut BoundaryPoint> {
        self.pending_commands
            .iter_mut()
            .flat_map(|command| [&mut command.range.start, &mut command.range.end])
    }

    /// Wrap the covered part of every text node in the range (whitespace included)
    /// in a `<span>` with an inline background colour
    fn paint_background(&mut self, range: DomRange, color: Rgba8) -> Vec<usize> {
        let style = format!("background-color: {};", serialize_rgb(color));
        let leaves = range.text_leaves(self);

        let mut created = Vec::with_capacity(leaves.len());
        let mut mutr = self.mutate();
        for leaf in leaves {
            let attrs = vec![Attribute {
                name: attr_name("style"),
                value: style.clone(),
            }];
            match mutr.surround_text(leaf.node, leaf.start, leaf.end, qual_name!("span", html), attrs)
            {
                Ok(span) => created.push(span),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Failed to paint text node {}: {_err:?}", leaf.node);
                }
            }
        }
        created
    }
}
