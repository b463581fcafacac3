use alloy::sol;

// Minimal read-only token interface. transfer() is declared for completeness
// and never sent.
sol! {
    #[derive(Debug)]
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 value) external returns (bool);
        function owner() external view returns (address);
    }
}
