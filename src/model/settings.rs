//! Server settings entity.

use serde::{Deserialize, Serialize};

/// Validated server settings. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    pub hostname: String,
    pub port: u16,
    pub playerlimit: u64,
    /// Client inactivity timeout in seconds.
    pub timeout: f64,
    /// Bind to loopback only.
    pub local: bool,

    /// Advertise the server on the master server list.
    pub use_masterserver: bool,
    pub masterserver_name: String,
    pub masterserver_description: String,
    pub masterserver_ip: String,

    pub announce_areas: bool,
    pub motd: String,

    pub modpass: String,
    pub cmpass: String,
    pub gmpass: String,
    /// Daily GM passwords, Monday through Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmpass7: Option<String>,

    pub debug: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_link: Option<String>,
    pub utc_offset: String,

    pub max_numdice: u64,
    pub max_numfaces: u64,
    pub max_modifier_length: u64,
    pub max_acceptable_term: f64,
    pub def_numdice: u64,
    pub def_numfaces: u64,
    pub def_modifier: String,

    pub blackout_background: String,
    pub default_area_description: String,
    pub party_lights_timeout: f64,
    pub showname_max_length: u64,
    pub sneak_handicap: f64,
    pub spectator_name: String,

    pub music_change_floodguard: Floodguard,
}

/// Limits on how often a client may change the music.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Floodguard {
    pub times_per_interval: u64,
    pub interval_length: f64,
    pub mute_length: f64,
}

impl ServerSettings {
    /// Every defined password with the key it was defined under.
    pub fn passwords(&self) -> Vec<(&'static str, &str)> {
        let mut all = vec![
            ("modpass", self.modpass.as_str()),
            ("cmpass", self.cmpass.as_str()),
            ("gmpass", self.gmpass.as_str()),
        ];
        let daily = [
            ("gmpass1", &self.gmpass1),
            ("gmpass2", &self.gmpass2),
            ("gmpass3", &self.gmpass3),
            ("gmpass4", &self.gmpass4),
            ("gmpass5", &self.gmpass5),
            ("gmpass6", &self.gmpass6),
            ("gmpass7", &self.gmpass7),
        ];
        all.extend(
            daily
                .into_iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (key, v))),
        );
        all
    }

    /// Daily GM password for a weekday (0 = Monday).
    pub fn daily_gmpass(&self, weekday: usize) -> Option<&str> {
        let daily = [
            &self.gmpass1,
            &self.gmpass2,
            &self.gmpass3,
            &self.gmpass4,
            &self.gmpass5,
            &self.gmpass6,
            &self.gmpass7,
        ];
        daily.get(weekday).and_then(|p| p.as_deref())
    }

    /// Message of the day with authored `\n` escapes turned into line breaks.
    pub fn motd_text(&self) -> String {
        self.motd.replace("\\n", " \n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ServerSettings {
        ServerSettings {
            hostname: "Court".into(),
            port: 27016,
            playerlimit: 100,
            timeout: 250.0,
            local: false,
            use_masterserver: false,
            masterserver_name: String::new(),
            masterserver_description: String::new(),
            masterserver_ip: String::new(),
            announce_areas: true,
            motd: "Welcome\\nto court".into(),
            modpass: "mod".into(),
            cmpass: "cm".into(),
            gmpass: "gm".into(),
            gmpass1: Some("monday".into()),
            gmpass2: None,
            gmpass3: None,
            gmpass4: None,
            gmpass5: None,
            gmpass6: None,
            gmpass7: Some("sunday".into()),
            debug: false,
            discord_link: None,
            utc_offset: "local".into(),
            max_numdice: 20,
            max_numfaces: 11_037,
            max_modifier_length: 12,
            max_acceptable_term: 22_074.0,
            def_numdice: 1,
            def_numfaces: 6,
            def_modifier: String::new(),
            blackout_background: "Blackout_HD".into(),
            default_area_description: "No description.".into(),
            party_lights_timeout: 10.0,
            showname_max_length: 30,
            sneak_handicap: 5.0,
            spectator_name: "SPECTATOR".into(),
            music_change_floodguard: Floodguard {
                times_per_interval: 1,
                interval_length: 0.0,
                mute_length: 0.0,
            },
        }
    }

    #[test]
    fn test_daily_passwords() {
        let settings = settings();
        assert_eq!(settings.daily_gmpass(0), Some("monday"));
        assert_eq!(settings.daily_gmpass(1), None);
        assert_eq!(settings.daily_gmpass(6), Some("sunday"));
        assert_eq!(settings.daily_gmpass(7), None);

        let keys: Vec<_> = settings.passwords().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["modpass", "cmpass", "gmpass", "gmpass1", "gmpass7"]);
    }

    #[test]
    fn test_motd_escapes_become_line_breaks() {
        assert_eq!(settings().motd_text(), "Welcome \nto court");
    }
}
