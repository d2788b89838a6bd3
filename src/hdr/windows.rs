// src/hdr/windows.rs
//! Display-configuration backed HDR service for Windows.

use super::packet::{
    decode_state, AdvancedColorInfoRequest, AdvancedColorStateRequest, INFO_PACKET_LEN,
};
use super::{AdapterId, DisplayConfigService, DisplayTarget};
use log::debug;
use windows::Win32::Devices::Display::{
    DisplayConfigGetDeviceInfo, DisplayConfigSetDeviceInfo, GetDisplayConfigBufferSizes,
    QueryDisplayConfig, DISPLAYCONFIG_DEVICE_INFO_HEADER, DISPLAYCONFIG_MODE_INFO,
    DISPLAYCONFIG_MODE_INFO_TYPE_TARGET, DISPLAYCONFIG_PATH_INFO, QDC_ONLY_ACTIVE_PATHS,
};

/// Packet bytes aligned for reinterpretation as a device-info header.
#[repr(C, align(4))]
struct PacketBuf<const N: usize>([u8; N]);

impl<const N: usize> PacketBuf<N> {
    fn header(&mut self) -> *mut DISPLAYCONFIG_DEVICE_INFO_HEADER {
        self.0.as_mut_ptr().cast()
    }
}

/// HDR service over `QueryDisplayConfig` and the device-info entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayConfigHdr;

impl DisplayConfigHdr {
    pub fn new() -> Self {
        DisplayConfigHdr
    }
}

impl DisplayConfigService for DisplayConfigHdr {
    fn active_target(&self) -> Option<DisplayTarget> {
        let mut path_count = 0u32;
        let mut mode_count = 0u32;
        unsafe {
            if GetDisplayConfigBufferSizes(QDC_ONLY_ACTIVE_PATHS, &mut path_count, &mut mode_count)
                .is_err()
            {
                debug!("GetDisplayConfigBufferSizes failed");
                return None;
            }
        }

        let mut paths = vec![DISPLAYCONFIG_PATH_INFO::default(); path_count as usize];
        let mut modes = vec![DISPLAYCONFIG_MODE_INFO::default(); mode_count as usize];

        unsafe {
            if QueryDisplayConfig(
                QDC_ONLY_ACTIVE_PATHS,
                &mut path_count,
                paths.as_mut_ptr(),
                &mut mode_count,
                modes.as_mut_ptr(),
                None,
            )
            .is_err()
            {
                debug!("QueryDisplayConfig failed");
                return None;
            }
        }
        modes.truncate(mode_count as usize);

        modes
            .iter()
            .find(|mode| mode.infoType == DISPLAYCONFIG_MODE_INFO_TYPE_TARGET)
            .map(|mode| DisplayTarget {
                adapter: AdapterId {
                    low_part: mode.adapterId.LowPart,
                    high_part: mode.adapterId.HighPart,
                },
                id: mode.id,
            })
    }

    fn advanced_color_state(&self, target: DisplayTarget) -> Option<u8> {
        let mut packet = PacketBuf::<INFO_PACKET_LEN>(AdvancedColorInfoRequest::new(target).encode());
        let rc = unsafe { DisplayConfigGetDeviceInfo(packet.header()) };
        if rc != 0 {
            debug!("DisplayConfigGetDeviceInfo returned {}", rc);
            return None;
        }
        Some(decode_state(&packet.0))
    }

    fn set_advanced_color_state(&self, target: DisplayTarget, enable: bool) -> bool {
        let mut packet = PacketBuf(AdvancedColorStateRequest::new(target, enable).encode());
        let rc = unsafe { DisplayConfigSetDeviceInfo(packet.header()) };
        if rc != 0 {
            debug!("DisplayConfigSetDeviceInfo returned {}", rc);
        }
        rc == 0
    }
}
