use chainwatch_core::{Frequency, Mode, Msg, OptionId};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  mode scheduled|realtime   pick a processing mode
  select <option id>        pick an option of the current mode
  blocks <1-100>            blocks per fetch
  auto on|off               automatic refresh
  freq 5m|10m|30m|60m|1h    refresh cadence
  fetch                     fetch now
  model on|off              enable or disable the analysis model
  detail <hash>             show one record
  close                     close the record detail
  dismiss                   dismiss the current notice
  health                    check the backend now
  back                      back to mode selection
  show                      print the dashboard
  help                      this text
  quit                      exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid value for `{command}`: {message}")]
    InvalidArgument {
        command: &'static str,
        message: String,
    },
}

pub fn parse(line: &str) -> Result<Command, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Nothing);
    };
    let arg = words.next();

    let msg = match head.to_ascii_lowercase().as_str() {
        "mode" => Msg::ModeSelected(parse_arg("mode", "scheduled or realtime", arg, |raw| {
            raw.parse::<Mode>().map_err(|err| err.to_string())
        })?),
        "select" => Msg::OptionSelected(parse_arg("select", "an option id", arg, |raw| {
            raw.parse::<OptionId>().map_err(|err| err.to_string())
        })?),
        "blocks" => Msg::BlockCountChanged(parse_arg("blocks", "a block count", arg, |raw| {
            raw.parse::<u32>().map_err(|err| err.to_string())
        })?),
        "auto" => Msg::AutoRefreshToggled(parse_arg("auto", "on or off", arg, parse_switch)?),
        "freq" => Msg::FrequencySelected(parse_arg("freq", "a cadence label", arg, |raw| {
            raw.parse::<Frequency>().map_err(|err| err.to_string())
        })?),
        "model" => Msg::ModelToggleRequested(parse_arg("model", "on or off", arg, parse_switch)?),
        "detail" => Msg::DetailRequested(parse_arg("detail", "a record hash", arg, |raw| {
            Ok(raw.to_string())
        })?),
        "fetch" => Msg::FetchClicked,
        "close" => Msg::DetailClosed,
        "dismiss" => Msg::AdvisoryDismissed,
        "health" => Msg::HealthCheckDue,
        "back" => Msg::BackToModeClicked,
        "show" | "status" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn parse_arg<T>(
    command: &'static str,
    expected: &'static str,
    arg: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, InputError> {
    let raw = arg.ok_or(InputError::MissingArgument { command, expected })?;
    parse(raw).map_err(|message| InputError::InvalidArgument { command, message })
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got `{other}`")),
    }
}
