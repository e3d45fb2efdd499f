use super::HomeApi;
use crate::cache::{CacheKey, Resource};
use crate::ports::ApiRequest;
use crate::validation;
use crate::{ApiError, Result};
use homepanel_types::{
    AcCommand, AcDevice, AcState, BroadlinkDevice, BroadlinkLookup, BroadlinkSend, HueBridge,
    HueGroup, HueGroupState, NewAcDevice, NewBroadlinkDevice,
};

impl HomeApi {
    // --- Air conditioning ---

    pub async fn ac_devices(&self) -> Result<Vec<AcDevice>> {
        self.query(CacheKey::list(Resource::AcDevices), "/devices/ac".into())
            .await
    }

    pub async fn add_ac_device(&self, device: &NewAcDevice) -> Result<AcDevice> {
        validation::required("name", &device.name)?;
        validation::validate_ipv4("ip", &device.ip)?;
        self.mutate(
            ApiRequest::post("/devices/ac").json(device)?,
            &[CacheKey::list(Resource::AcDevices)],
        )
        .await
    }

    pub async fn remove_ac_device(&self, id: i64) -> Result<()> {
        self.mutate_empty(
            ApiRequest::delete(format!("/devices/ac/{}", id)),
            &[CacheKey::list(Resource::AcDevices)],
        )
        .await
    }

    pub async fn send_ac_command(&self, device_id: i64, command: &AcCommand) -> Result<AcState> {
        if let AcCommand::Temperature { value } = command {
            validation::validate_temperature(*value)?;
        }
        self.mutate(
            ApiRequest::post(format!("/actions/ac/{}", device_id)).json(command)?,
            &[CacheKey::list(Resource::AcDevices)],
        )
        .await
    }

    // --- Broadlink ---

    pub async fn broadlink_devices(&self) -> Result<Vec<BroadlinkDevice>> {
        self.query(
            CacheKey::list(Resource::BroadlinkDevices),
            "/devices/broadlink".into(),
        )
        .await
    }

    /// Probe `ip` for a Broadlink device before registering it
    pub async fn lookup_broadlink(&self, ip: &str) -> Result<BroadlinkLookup> {
        validation::validate_ipv4("ip", ip)?;
        let request = ApiRequest::get(format!("/devices/broadlink/lookup/{}", ip.trim()));
        match self.dispatcher.send_json(request).await {
            Err(e) if e.status() == Some(404) => Err(ApiError::NotFound(format!(
                "No Broadlink device responded at {}",
                ip.trim()
            ))),
            other => other,
        }
    }

    pub async fn add_broadlink_device(&self, device: &NewBroadlinkDevice) -> Result<BroadlinkDevice> {
        validation::validate_ipv4("ip", &device.ip)?;
        validation::validate_mac("mac", &device.mac)?;
        validation::required("name", &device.name)?;
        self.mutate(
            ApiRequest::post("/devices/broadlink").json(device)?,
            &[CacheKey::list(Resource::BroadlinkDevices)],
        )
        .await
    }

    pub async fn remove_broadlink_device(&self, id: i64) -> Result<()> {
        self.mutate_empty(
            ApiRequest::delete(format!("/devices/broadlink/{}", id)),
            &[CacheKey::list(Resource::BroadlinkDevices)],
        )
        .await
    }

    /// Replay a learned IR/RF command
    pub async fn send_broadlink_command(&self, device_id: i64, command: &str) -> Result<()> {
        validation::required("command", command)?;
        let body = BroadlinkSend {
            command: command.to_string(),
        };
        self.mutate_empty(
            ApiRequest::post(format!("/actions/broadlink/{}/send", device_id)).json(&body)?,
            &[],
        )
        .await
    }

    // --- Philips Hue ---

    pub async fn hue_bridges(&self) -> Result<Vec<HueBridge>> {
        self.query(CacheKey::list(Resource::HueBridges), "/devices/hue/bridges".into())
            .await
    }

    pub async fn set_hue_group(
        &self,
        bridge_id: i64,
        group_id: &str,
        state: &HueGroupState,
    ) -> Result<HueGroup> {
        validation::required("group_id", group_id)?;
        self.mutate(
            ApiRequest::post(format!("/actions/hue/{}/groups/{}", bridge_id, group_id))
                .json(state)?,
            &[CacheKey::list(Resource::HueBridges)],
        )
        .await
    }
}
