//! Type vocabularies — which class of device, module or iolet an entity is.

wire_enum!(
    /// Device class a driver is responsible for.
    DeviceType("device type", UnknownType) {
        GenericDummy => "GENERIC_DUMMY",
        GenericUsv => "GENERIC_USV",
        XlinkXlink => "XLINK_XLINK",
        RiedelFusion => "RIEDEL_FUSION",
        RiedelMuon => "RIEDEL_MUON",
        RiedelBolero => "RIEDEL_BOLERO",
        RiedelNsa02 => "RIEDEL_NSA02",
        DirectoutRavio => "DIRECTOUT_RAVIO",
    }
);

wire_enum!(
    /// Functional sub-unit class.
    ModuleType("module type", UnknownType) {
        Av => "AV",
        Gpio => "GPIO",
        /// Baseband / timing cards.
        Timing => "TIMING",
        Power => "POWER",
    }
);

wire_enum!(
    /// Signal port class.
    IoletType("iolet type", UnknownType) {
        IpVideoIn => "IP-VIDEO-IN",
        IpVideoOut => "IP-VIDEO-OUT",
        IpAudioIn => "IP-AUDIO-IN",
        IpAudioOut => "IP-AUDIO-OUT",
        IpData => "IP-DATA",
        IpTiming => "IP-TIMING",
        IpGpio => "IP-GPI",
        BbVideoIn => "BB-VIDEO-IN",
        BbVideoOut => "BB-VIDEO-OUT",
        BbAudioIn => "BB-AUDIO-IN",
        BbAudioOut => "BB-AUDIO-OUT",
        BbTiming => "BB-TIMING",
        BbGpio => "BB-GPI",
    }
);
