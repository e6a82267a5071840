//! Typed contract interfaces.
//!
//! Every method this layer touches is enumerated here with its exact
//! argument and return shape; nothing goes through untyped ABI values.

use alloy::sol;

sol! {
    /// Minimal ERC-20 surface: balances and the approval gate.
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address owner) external view returns (uint256 balance);
        function allowance(address owner, address spender) external view returns (uint256 remaining);
        function approve(address spender, uint256 value) external returns (bool ok);
    }
}

sol! {
    /// THOR/yTHOR → METRO migration escrow.
    ///
    /// Caps, deadlines, and ratios are fixed for the contract's lifetime;
    /// minted amounts move on every migration by any user.
    #[sol(rpc)]
    contract MigrationEscrow {
        function cap10M() external view returns (uint256 cap);
        function cap3M() external view returns (uint256 cap);
        function capYThor() external view returns (uint256 cap);
        function deadline10M() external view returns (uint256 deadline);
        function deadline3M() external view returns (uint256 deadline);
        function deadlineYThor() external view returns (uint256 deadline);
        function ratio10M() external view returns (uint256 ratio);
        function ratio3M() external view returns (uint256 ratio);
        function ratioYThor() external view returns (uint256 ratio);
        function migrationStartTime() external view returns (uint256 startTime);

        function minted10M() external view returns (uint256 minted);
        function minted3M() external view returns (uint256 minted);
        function mintedYThor() external view returns (uint256 minted);

        function migrateThor10m(uint256 amount) external;
        function migrateThor3m(uint256 amount) external;
        function migrateYThor(uint256 amount) external;
    }
}

sol! {
    /// xMETRO staking token: stake/unstake lifecycle, reward claims,
    /// autocompound controls, and the vesting-lock views.
    #[sol(rpc)]
    contract StakedMetro {
        function stake(uint256 amount) external returns (uint256 mintedShares);
        function stakeContributor(uint256 amount) external returns (uint256 mintedShares);

        function requestUnstake(uint256 amount) external;
        function unstakeDelay() external view returns (uint256 delay);
        function unstakeRequestCount(address owner) external view returns (uint256 count);
        function unstakeRequest(address owner, uint256 index) external view returns (uint256 amount, uint256 unlockTime);

        function withdraw(uint256 maxRequests) external returns (uint256 withdrawn);
        function withdrawUnlockedThor(uint256 maxLocks) external returns (uint256 withdrawn);
        function withdrawUnlockedYThor(uint256 maxLocks) external returns (uint256 withdrawn);
        function withdrawUnlockedContributor(uint256 maxSchedules) external returns (uint256 withdrawn);
        function previewWithdrawableNow(address owner) external view returns (uint256 thorAmount, uint256 ythorAmount, uint256 contributorAmount, uint256 totalAmount);

        function claimable(address owner) external view returns (uint256 amount);
        function claimRewards() external;

        function autocompound(uint256 minAmountOut, bytes swapData) external returns (uint256 amountOut);
        function enableAutocompound() external;
        function disableAutocompound() external;
        function autocompoundEnabled(address owner) external view returns (bool enabled);

        function contributorWhitelist(address owner) external view returns (bool allowed);

        function totalShares() external view returns (uint256 shares);
        function totalLockedShares() external view returns (uint256 shares);
        function totalSharesOf(address owner) external view returns (uint256 shares);
        function lockedShares(address owner) external view returns (uint256 shares);
    }
}
