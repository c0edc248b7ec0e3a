//! Command table.
//!
//! Every `message_type` value the protocol defines, together with the name
//! of the protobuf message its payload carries. Payload decoding itself is
//! left to the dispatch layer.

use std::fmt;

use crate::error::MaxPbError;

/// Command identifier carried in the `message_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum CommandCode {
    // === Link control ===
    KeepAlive = 0x0000,
    Position = 0x0001,
    Ack = 0x0002,
    Nack = 0x0003,

    // === Device control, configuration and reports ===
    GeneratePosition = 0x0004,
    RequestPositionLog = 0x0005,
    FileChange = 0x0006,
    FileRequestData = 0x0007,
    FileData = 0x0008,
    FileErase = 0x0009,
    FileCancel = 0x000A,
    FileUploadInit = 0x000B,
    FileUploadRequestData = 0x000C,
    FileUploadData = 0x000D,
    FileChangeByDiff = 0x000E,
    RequestStatus = 0x0010,
    Status = 0x0011,
    MultipleReportLora = 0x0012,
    RequestSetup = 0x0013,
    SetupData = 0x0014,
    ReportBlackbox = 0x0015,
    RequestPositionInRam = 0x0016,
    WriteRs232 = 0x0017,
    OpenDataAdd = 0x0018,
    Router = 0x0019,
    User = 0x001A,
    AccelerometerEventDetail = 0x001B,
    ScanOtherOperatorCells = 0x001C,
    SetInputCounter = 0x001D,
    RequestLoraSetup = 0x001E,
    LoraSetupData = 0x001F,
    SetupDefault = 0x0020,
    Password = 0x0021,
    PasswordStore = 0x0022,
    SetVariables = 0x0023,
    RequestVariables = 0x0024,
    VariablesData = 0x0025,
    FormatPositionLog = 0x0026,
    ClearPositionLog = 0x0027,
    ExecuteEmbeddedAction = 0x0028,
    SetVariablesOnFlash = 0x0029,
    RequestLoraWanNwkList = 0x002A,
    LoraWanNwkListData = 0x002B,
    RequestTxPacket = 0x002C,
    ClearEcuInfo = 0x002D,
    RequestCustomReportData = 0x002E,
    ReportSigfox = 0x002F,
    SetPower = 0x0030,
    SetOutput = 0x0031,
    SetOperationalState = 0x0032,
    IgnAutoCalib = 0x0033,
    AccRestartCalib = 0x0034,
    AccDeactivateCalib = 0x0035,
    Disconnect = 0x0036,
    LoraGatewayControl = 0x0037,
    LoraCommand = 0x0038,
    SetBleVars = 0x0039,
    StartBluetooth = 0x003A,
    FileEdit = 0x003B,
    FileEditResult = 0x003C,
    LogInfoRequest = 0x003D,
    LogInfoData = 0x003E,
    AcquireVehicleSignature = 0x003F,

    // === Legacy setup (0x0106-0x010B) ===
    PosConnect = 0x0106,
    Rs232Connect = 0x0107,
    ChangeSetup = 0x0108,
    ChangeMaxIoSetup = 0x010B,

    // === Channel lifetime ===
    /// Only valid as the answer to an ack.
    KeepChannelOpen = 0x0201,
    /// Only valid as the answer to an ack.
    YouCanCloseChannel = 0x0202,
}

impl CommandCode {
    /// All commands in wire-value order.
    pub const ALL: &'static [CommandCode] = &[
        CommandCode::KeepAlive,
        CommandCode::Position,
        CommandCode::Ack,
        CommandCode::Nack,
        CommandCode::GeneratePosition,
        CommandCode::RequestPositionLog,
        CommandCode::FileChange,
        CommandCode::FileRequestData,
        CommandCode::FileData,
        CommandCode::FileErase,
        CommandCode::FileCancel,
        CommandCode::FileUploadInit,
        CommandCode::FileUploadRequestData,
        CommandCode::FileUploadData,
        CommandCode::FileChangeByDiff,
        CommandCode::RequestStatus,
        CommandCode::Status,
        CommandCode::MultipleReportLora,
        CommandCode::RequestSetup,
        CommandCode::SetupData,
        CommandCode::ReportBlackbox,
        CommandCode::RequestPositionInRam,
        CommandCode::WriteRs232,
        CommandCode::OpenDataAdd,
        CommandCode::Router,
        CommandCode::User,
        CommandCode::AccelerometerEventDetail,
        CommandCode::ScanOtherOperatorCells,
        CommandCode::SetInputCounter,
        CommandCode::RequestLoraSetup,
        CommandCode::LoraSetupData,
        CommandCode::SetupDefault,
        CommandCode::Password,
        CommandCode::PasswordStore,
        CommandCode::SetVariables,
        CommandCode::RequestVariables,
        CommandCode::VariablesData,
        CommandCode::FormatPositionLog,
        CommandCode::ClearPositionLog,
        CommandCode::ExecuteEmbeddedAction,
        CommandCode::SetVariablesOnFlash,
        CommandCode::RequestLoraWanNwkList,
        CommandCode::LoraWanNwkListData,
        CommandCode::RequestTxPacket,
        CommandCode::ClearEcuInfo,
        CommandCode::RequestCustomReportData,
        CommandCode::ReportSigfox,
        CommandCode::SetPower,
        CommandCode::SetOutput,
        CommandCode::SetOperationalState,
        CommandCode::IgnAutoCalib,
        CommandCode::AccRestartCalib,
        CommandCode::AccDeactivateCalib,
        CommandCode::Disconnect,
        CommandCode::LoraGatewayControl,
        CommandCode::LoraCommand,
        CommandCode::SetBleVars,
        CommandCode::StartBluetooth,
        CommandCode::FileEdit,
        CommandCode::FileEditResult,
        CommandCode::LogInfoRequest,
        CommandCode::LogInfoData,
        CommandCode::AcquireVehicleSignature,
        CommandCode::PosConnect,
        CommandCode::Rs232Connect,
        CommandCode::ChangeSetup,
        CommandCode::ChangeMaxIoSetup,
        CommandCode::KeepChannelOpen,
        CommandCode::YouCanCloseChannel,
    ];

    /// Name of the protobuf message carried by this command, if any.
    pub fn payload_schema(self) -> Option<&'static str> {
        use CommandCode::*;

        match self {
            KeepAlive
            | GeneratePosition
            | RequestStatus
            | RequestSetup
            | RequestPositionInRam
            | ScanOtherOperatorCells
            | RequestLoraSetup
            | SetupDefault
            | RequestVariables
            | FormatPositionLog
            | ClearPositionLog
            | RequestLoraWanNwkList
            | ClearEcuInfo
            | RequestCustomReportData
            | IgnAutoCalib
            | AccRestartCalib
            | AccDeactivateCalib
            | StartBluetooth
            | LogInfoRequest
            | AcquireVehicleSignature
            | PosConnect
            | Rs232Connect
            => Some("BasicCommand"),
            Position => Some("MultipleReportData"),
            Ack => Some("Ack"),
            Nack => Some("Nack"),
            RequestPositionLog => Some("ReportDataLog"),
            FileChange | FileCancel | FileUploadInit | FileChangeByDiff => Some("FileCommand"),
            FileRequestData
            | FileData
            | FileUploadRequestData
            | FileUploadData
            => Some("FileTransfer"),
            FileErase => Some("FileErase"),
            Status => Some("ReportStatus"),
            MultipleReportLora => Some("MultipleReportLora"),
            SetupData => Some("ReportMaxConfig"),
            ReportBlackbox => Some("ReportBlackBox"),
            WriteRs232 => Some("WriteRs232"),
            OpenDataAdd => Some("OpenDataAdd"),
            Router => Some("RoutePack"),
            User => Some("UserCommand"),
            AccelerometerEventDetail => Some("ReportAccelerometerEventDetail"),
            SetInputCounter => Some("SetInputCounter"),
            LoraSetupData => Some("ReportLoraConfigPeripherals"),
            Password => Some("PasswordEnter"),
            PasswordStore => Some("PasswordStore"),
            SetVariables | VariablesData | SetVariablesOnFlash => Some("Variables"),
            ExecuteEmbeddedAction => Some("ExecuteEmbeddedAction"),
            LoraWanNwkListData => Some("ReportLoraWANNetworkConfigList"),
            RequestTxPacket => Some("RequestTransmissionPacket"),
            ReportSigfox => Some("SigfoxData"),
            SetPower => Some("SetPower"),
            SetOutput => Some("SetOutput"),
            SetOperationalState => Some("SetOperationalState"),
            Disconnect => Some("Disconnect"),
            LoraGatewayControl => Some("LoraGatewayCmd"),
            LoraCommand => Some("LoraCommand"),
            SetBleVars => Some("SetBleVars"),
            FileEdit => Some("FileEdit"),
            FileEditResult => Some("FileEditResult"),
            LogInfoData => Some("ReportLogInfo"),
            ChangeSetup => Some("ChangeMaxConfig"),
            ChangeMaxIoSetup => Some("ChangeMaxIOConfig"),
            KeepChannelOpen | YouCanCloseChannel => None,
        }
    }

    /// Variant name, for logs.
    pub fn name(self) -> &'static str {
        match self {
            CommandCode::KeepAlive => "KeepAlive",
            CommandCode::Position => "Position",
            CommandCode::Ack => "Ack",
            CommandCode::Nack => "Nack",
            CommandCode::GeneratePosition => "GeneratePosition",
            CommandCode::RequestPositionLog => "RequestPositionLog",
            CommandCode::FileChange => "FileChange",
            CommandCode::FileRequestData => "FileRequestData",
            CommandCode::FileData => "FileData",
            CommandCode::FileErase => "FileErase",
            CommandCode::FileCancel => "FileCancel",
            CommandCode::FileUploadInit => "FileUploadInit",
            CommandCode::FileUploadRequestData => "FileUploadRequestData",
            CommandCode::FileUploadData => "FileUploadData",
            CommandCode::FileChangeByDiff => "FileChangeByDiff",
            CommandCode::RequestStatus => "RequestStatus",
            CommandCode::Status => "Status",
            CommandCode::MultipleReportLora => "MultipleReportLora",
            CommandCode::RequestSetup => "RequestSetup",
            CommandCode::SetupData => "SetupData",
            CommandCode::ReportBlackbox => "ReportBlackbox",
            CommandCode::RequestPositionInRam => "RequestPositionInRam",
            CommandCode::WriteRs232 => "WriteRs232",
            CommandCode::OpenDataAdd => "OpenDataAdd",
            CommandCode::Router => "Router",
            CommandCode::User => "User",
            CommandCode::AccelerometerEventDetail => "AccelerometerEventDetail",
            CommandCode::ScanOtherOperatorCells => "ScanOtherOperatorCells",
            CommandCode::SetInputCounter => "SetInputCounter",
            CommandCode::RequestLoraSetup => "RequestLoraSetup",
            CommandCode::LoraSetupData => "LoraSetupData",
            CommandCode::SetupDefault => "SetupDefault",
            CommandCode::Password => "Password",
            CommandCode::PasswordStore => "PasswordStore",
            CommandCode::SetVariables => "SetVariables",
            CommandCode::RequestVariables => "RequestVariables",
            CommandCode::VariablesData => "VariablesData",
            CommandCode::FormatPositionLog => "FormatPositionLog",
            CommandCode::ClearPositionLog => "ClearPositionLog",
            CommandCode::ExecuteEmbeddedAction => "ExecuteEmbeddedAction",
            CommandCode::SetVariablesOnFlash => "SetVariablesOnFlash",
            CommandCode::RequestLoraWanNwkList => "RequestLoraWanNwkList",
            CommandCode::LoraWanNwkListData => "LoraWanNwkListData",
            CommandCode::RequestTxPacket => "RequestTxPacket",
            CommandCode::ClearEcuInfo => "ClearEcuInfo",
            CommandCode::RequestCustomReportData => "RequestCustomReportData",
            CommandCode::ReportSigfox => "ReportSigfox",
            CommandCode::SetPower => "SetPower",
            CommandCode::SetOutput => "SetOutput",
            CommandCode::SetOperationalState => "SetOperationalState",
            CommandCode::IgnAutoCalib => "IgnAutoCalib",
            CommandCode::AccRestartCalib => "AccRestartCalib",
            CommandCode::AccDeactivateCalib => "AccDeactivateCalib",
            CommandCode::Disconnect => "Disconnect",
            CommandCode::LoraGatewayControl => "LoraGatewayControl",
            CommandCode::LoraCommand => "LoraCommand",
            CommandCode::SetBleVars => "SetBleVars",
            CommandCode::StartBluetooth => "StartBluetooth",
            CommandCode::FileEdit => "FileEdit",
            CommandCode::FileEditResult => "FileEditResult",
            CommandCode::LogInfoRequest => "LogInfoRequest",
            CommandCode::LogInfoData => "LogInfoData",
            CommandCode::AcquireVehicleSignature => "AcquireVehicleSignature",
            CommandCode::PosConnect => "PosConnect",
            CommandCode::Rs232Connect => "Rs232Connect",
            CommandCode::ChangeSetup => "ChangeSetup",
            CommandCode::ChangeMaxIoSetup => "ChangeMaxIoSetup",
            CommandCode::KeepChannelOpen => "KeepChannelOpen",
            CommandCode::YouCanCloseChannel => "YouCanCloseChannel",
        }
    }
}

impl TryFrom<u16> for CommandCode {
    type Error = MaxPbError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(CommandCode::KeepAlive),
            0x0001 => Ok(CommandCode::Position),
            0x0002 => Ok(CommandCode::Ack),
            0x0003 => Ok(CommandCode::Nack),
            0x0004 => Ok(CommandCode::GeneratePosition),
            0x0005 => Ok(CommandCode::RequestPositionLog),
            0x0006 => Ok(CommandCode::FileChange),
            0x0007 => Ok(CommandCode::FileRequestData),
            0x0008 => Ok(CommandCode::FileData),
            0x0009 => Ok(CommandCode::FileErase),
            0x000A => Ok(CommandCode::FileCancel),
            0x000B => Ok(CommandCode::FileUploadInit),
            0x000C => Ok(CommandCode::FileUploadRequestData),
            0x000D => Ok(CommandCode::FileUploadData),
            0x000E => Ok(CommandCode::FileChangeByDiff),
            0x0010 => Ok(CommandCode::RequestStatus),
            0x0011 => Ok(CommandCode::Status),
            0x0012 => Ok(CommandCode::MultipleReportLora),
            0x0013 => Ok(CommandCode::RequestSetup),
            0x0014 => Ok(CommandCode::SetupData),
            0x0015 => Ok(CommandCode::ReportBlackbox),
            0x0016 => Ok(CommandCode::RequestPositionInRam),
            0x0017 => Ok(CommandCode::WriteRs232),
            0x0018 => Ok(CommandCode::OpenDataAdd),
            0x0019 => Ok(CommandCode::Router),
            0x001A => Ok(CommandCode::User),
            0x001B => Ok(CommandCode::AccelerometerEventDetail),
            0x001C => Ok(CommandCode::ScanOtherOperatorCells),
            0x001D => Ok(CommandCode::SetInputCounter),
            0x001E => Ok(CommandCode::RequestLoraSetup),
            0x001F => Ok(CommandCode::LoraSetupData),
            0x0020 => Ok(CommandCode::SetupDefault),
            0x0021 => Ok(CommandCode::Password),
            0x0022 => Ok(CommandCode::PasswordStore),
            0x0023 => Ok(CommandCode::SetVariables),
            0x0024 => Ok(CommandCode::RequestVariables),
            0x0025 => Ok(CommandCode::VariablesData),
            0x0026 => Ok(CommandCode::FormatPositionLog),
            0x0027 => Ok(CommandCode::ClearPositionLog),
            0x0028 => Ok(CommandCode::ExecuteEmbeddedAction),
            0x0029 => Ok(CommandCode::SetVariablesOnFlash),
            0x002A => Ok(CommandCode::RequestLoraWanNwkList),
            0x002B => Ok(CommandCode::LoraWanNwkListData),
            0x002C => Ok(CommandCode::RequestTxPacket),
            0x002D => Ok(CommandCode::ClearEcuInfo),
            0x002E => Ok(CommandCode::RequestCustomReportData),
            0x002F => Ok(CommandCode::ReportSigfox),
            0x0030 => Ok(CommandCode::SetPower),
            0x0031 => Ok(CommandCode::SetOutput),
            0x0032 => Ok(CommandCode::SetOperationalState),
            0x0033 => Ok(CommandCode::IgnAutoCalib),
            0x0034 => Ok(CommandCode::AccRestartCalib),
            0x0035 => Ok(CommandCode::AccDeactivateCalib),
            0x0036 => Ok(CommandCode::Disconnect),
            0x0037 => Ok(CommandCode::LoraGatewayControl),
            0x0038 => Ok(CommandCode::LoraCommand),
            0x0039 => Ok(CommandCode::SetBleVars),
            0x003A => Ok(CommandCode::StartBluetooth),
            0x003B => Ok(CommandCode::FileEdit),
            0x003C => Ok(CommandCode::FileEditResult),
            0x003D => Ok(CommandCode::LogInfoRequest),
            0x003E => Ok(CommandCode::LogInfoData),
            0x003F => Ok(CommandCode::AcquireVehicleSignature),
            0x0106 => Ok(CommandCode::PosConnect),
            0x0107 => Ok(CommandCode::Rs232Connect),
            0x0108 => Ok(CommandCode::ChangeSetup),
            0x010B => Ok(CommandCode::ChangeMaxIoSetup),
            0x0201 => Ok(CommandCode::KeepChannelOpen),
            0x0202 => Ok(CommandCode::YouCanCloseChannel),
            _ => Err(MaxPbError::UnknownCommand(value)),
        }
    }
}

impl CommandCode {
    /// Wire value.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Channel-lifetime hints may only be sent in response to an ack.
    #[inline]
    pub fn is_channel_hint(self) -> bool {
        matches!(
            self,
            CommandCode::KeepChannelOpen | CommandCode::YouCanCloseChannel
        )
    }

    /// Legacy setup range 0x0106-0x010B.
    #[inline]
    pub fn is_legacy(self) -> bool {
        (0x0106..=0x010B).contains(&self.code())
    }
}

impl From<CommandCode> for u16 {
    fn from(command: CommandCode) -> Self {
        command.code()
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#06x})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_round_trips_through_u16() {
        for &command in CommandCode::ALL {
            assert_eq!(CommandCode::try_from(command.code()).unwrap(), command);
        }
    }

    #[test]
    fn test_table_size_and_order() {
        assert_eq!(CommandCode::ALL.len(), 69);
        assert!(CommandCode::ALL.windows(2).all(|w| w[0].code() < w[1].code()));
    }

    #[test]
    fn test_gaps_are_unknown() {
        for code in [0x000F, 0x0040, 0x0100, 0x0109, 0x010A, 0x0200, 0xFFFF] {
            let err = CommandCode::try_from(code).unwrap_err();
            assert!(matches!(err, MaxPbError::UnknownCommand(c) if c == code));
        }
    }

    #[test]
    fn test_well_known_values() {
        assert_eq!(CommandCode::KeepAlive.code(), 0x0000);
        assert_eq!(CommandCode::Position.code(), 0x0001);
        assert_eq!(CommandCode::Ack.code(), 0x0002);
        assert_eq!(CommandCode::Nack.code(), 0x0003);
        assert_eq!(CommandCode::ChangeMaxIoSetup.code(), 0x010B);
    }

    #[test]
    fn test_payload_schema() {
        assert_eq!(
            CommandCode::Position.payload_schema(),
            Some("MultipleReportData")
        );
        assert_eq!(CommandCode::Status.payload_schema(), Some("ReportStatus"));
        assert_eq!(CommandCode::KeepChannelOpen.payload_schema(), None);
    }

    #[test]
    fn test_classification() {
        assert!(CommandCode::YouCanCloseChannel.is_channel_hint());
        assert!(!CommandCode::Ack.is_channel_hint());
        assert!(CommandCode::Rs232Connect.is_legacy());
        assert!(!CommandCode::Disconnect.is_legacy());
    }

    #[test]
    fn test_display() {
        assert_eq!(CommandCode::Nack.to_string(), "Nack(0x0003)");
    }
}
